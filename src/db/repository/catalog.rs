use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::AvailableLabTest;

pub fn insert_available_lab_test(
    conn: &Connection,
    entry: &AvailableLabTest,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO available_lab_tests (id, name, code, department, base_fee, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id.to_string(),
            entry.name,
            entry.code,
            entry.department,
            entry.base_fee,
            entry.active,
        ],
    )?;
    Ok(())
}

pub fn get_available_lab_test(
    conn: &Connection,
    id: &Uuid,
) -> Result<AvailableLabTest, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, code, department, base_fee, active
         FROM available_lab_tests WHERE id = ?1",
    )?;
    stmt.query_row(params![id.to_string()], catalog_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "available_lab_test".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Active catalog entries, the list booking forms present.
pub fn list_active_lab_tests(conn: &Connection) -> Result<Vec<AvailableLabTest>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, code, department, base_fee, active
         FROM available_lab_tests WHERE active = 1 ORDER BY name",
    )?;
    let rows = stmt.query_map([], catalog_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Soft delete: deactivated entries stay referenced by past bookings.
pub fn deactivate_lab_test(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE available_lab_tests SET active = 0 WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "available_lab_test".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn catalog_from_row(row: &rusqlite::Row<'_>) -> Result<AvailableLabTest, rusqlite::Error> {
    Ok(AvailableLabTest {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        code: row.get(2)?,
        department: row.get(3)?,
        base_fee: row.get(4)?,
        active: row.get(5)?,
    })
}
