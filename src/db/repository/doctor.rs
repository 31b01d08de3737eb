use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Doctor;

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, department, fee_percentage, available)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.department,
            doctor.fee_percentage,
            doctor.available,
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Doctor, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, department, fee_percentage, available FROM doctors WHERE id = ?1",
    )?;
    stmt.query_row(params![id.to_string()], doctor_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "doctor".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// List doctors, optionally restricted to one department.
pub fn get_doctors(conn: &Connection, department: Option<&str>) -> Result<Vec<Doctor>, DatabaseError> {
    let (sql, args): (&str, Vec<String>) = match department {
        Some(dept) => (
            "SELECT id, name, department, fee_percentage, available
             FROM doctors WHERE department = ?1 ORDER BY name",
            vec![dept.to_string()],
        ),
        None => (
            "SELECT id, name, department, fee_percentage, available
             FROM doctors ORDER BY name",
            vec![],
        ),
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args), doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn set_doctor_availability(
    conn: &Connection,
    id: &Uuid,
    available: bool,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET available = ?2 WHERE id = ?1",
        params![id.to_string(), available],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn update_doctor_fee_percentage(
    conn: &Connection,
    id: &Uuid,
    fee_percentage: f64,
) -> Result<(), DatabaseError> {
    if fee_percentage < 0.0 {
        return Err(DatabaseError::ConstraintViolation(format!(
            "fee percentage must be non-negative, got {fee_percentage}"
        )));
    }
    let changed = conn.execute(
        "UPDATE doctors SET fee_percentage = ?2 WHERE id = ?1",
        params![id.to_string(), fee_percentage],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn doctor_from_row(row: &rusqlite::Row<'_>) -> Result<Doctor, rusqlite::Error> {
    Ok(Doctor {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        department: row.get(2)?,
        fee_percentage: row.get(3)?,
        available: row.get(4)?,
    })
}
