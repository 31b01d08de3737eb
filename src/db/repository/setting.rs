//! String key-value settings, plus typed helpers for the keys the
//! booking paths read.
//!
//! Department fee percentages live under `department_fee_pct.<name>`;
//! a missing key means no departmental markup.

use rusqlite::{params, Connection};

use crate::db::DatabaseError;

/// Default no-show grace when the setting is absent.
pub const DEFAULT_NO_SHOW_GRACE_MINUTES: i64 = 30;

/// Get a setting by key. Returns None if not set.
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, String>(0)) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Set a setting (upsert).
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Delete a setting.
pub fn delete_setting(conn: &Connection, key: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
    Ok(())
}

/// Markup percentage for a department (0 when unset or unparseable).
pub fn department_fee_pct(conn: &Connection, department: &str) -> Result<f64, DatabaseError> {
    let key = format!("department_fee_pct.{department}");
    Ok(get_setting(conn, &key)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0))
}

/// Minutes past the slot before a scheduled entry is swept to no-show.
pub fn no_show_grace_minutes(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(get_setting(conn, "no_show_grace_minutes")?
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_NO_SHOW_GRACE_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn upsert_and_get() {
        let conn = open_memory_database().unwrap();
        assert!(get_setting(&conn, "motd").unwrap().is_none());

        set_setting(&conn, "motd", "clinic closed friday").unwrap();
        assert_eq!(
            get_setting(&conn, "motd").unwrap().as_deref(),
            Some("clinic closed friday")
        );

        set_setting(&conn, "motd", "open as usual").unwrap();
        assert_eq!(
            get_setting(&conn, "motd").unwrap().as_deref(),
            Some("open as usual")
        );
    }

    #[test]
    fn delete_removes_key() {
        let conn = open_memory_database().unwrap();
        set_setting(&conn, "motd", "x").unwrap();
        delete_setting(&conn, "motd").unwrap();
        assert!(get_setting(&conn, "motd").unwrap().is_none());
    }

    #[test]
    fn department_pct_defaults_to_zero() {
        let conn = open_memory_database().unwrap();
        assert_eq!(department_fee_pct(&conn, "cardiology").unwrap(), 0.0);

        set_setting(&conn, "department_fee_pct.cardiology", "5").unwrap();
        assert_eq!(department_fee_pct(&conn, "cardiology").unwrap(), 5.0);

        // Unparseable values fall back to zero rather than erroring
        set_setting(&conn, "department_fee_pct.cardiology", "five").unwrap();
        assert_eq!(department_fee_pct(&conn, "cardiology").unwrap(), 0.0);
    }

    #[test]
    fn grace_minutes_default_and_override() {
        let conn = open_memory_database().unwrap();
        assert_eq!(no_show_grace_minutes(&conn).unwrap(), 30);

        set_setting(&conn, "no_show_grace_minutes", "45").unwrap();
        assert_eq!(no_show_grace_minutes(&conn).unwrap(), 45);
    }
}
