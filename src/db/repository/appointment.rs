use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::{Appointment, AppointmentFilter};

const COLUMNS: &str = "id, patient_id, doctor_id, department, scheduled_at, status, reason,
     base_fee, doctor_fee_pct, department_fee_pct, total_fee, created_at, updated_at";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, department, scheduled_at, status,
         reason, base_fee, doctor_fee_pct, department_fee_pct, total_fee, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.department,
            appt.scheduled_at.to_rfc3339(),
            appt.status.as_str(),
            appt.reason,
            appt.base_fee,
            appt.doctor_fee_pct,
            appt.department_fee_pct,
            appt.total_fee,
            appt.created_at.to_rfc3339(),
            appt.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, DatabaseError> {
    let sql = format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_row(params![id.to_string()], |row| Ok(appointment_row(row)))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "appointment".into(),
                id: id.to_string(),
            },
            other => DatabaseError::from(other),
        })??;
    appointment_from_row(row)
}

/// List appointments matching the filter, newest slot first.
pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(patient_id) = &filter.patient_id {
        args.push(patient_id.to_string());
        conditions.push("patient_id = ?");
    }
    if let Some(doctor_id) = &filter.doctor_id {
        args.push(doctor_id.to_string());
        conditions.push("doctor_id = ?");
    }
    if let Some(status) = &filter.status {
        args.push(status.as_str().to_string());
        conditions.push("status = ?");
    }
    if let Some(from) = &filter.from {
        args.push(from.to_rfc3339());
        conditions.push("scheduled_at >= ?");
    }
    if let Some(to) = &filter.to {
        args.push(to.to_rfc3339());
        conditions.push("scheduled_at < ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("SELECT {COLUMNS} FROM appointments{where_clause} ORDER BY scheduled_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
        Ok(appointment_row(row))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row??)?);
    }
    Ok(appointments)
}

/// Persist a status change. Transition validity is enforced by the
/// service layer before calling this.
pub fn set_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
    updated_at: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.to_string(), status.as_str(), updated_at.to_rfc3339()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Scheduled appointments whose slot is already behind `cutoff`
/// (no-show sweep candidates).
pub fn list_overdue_scheduled_appointments(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE status = 'scheduled' AND scheduled_at < ?1
         ORDER BY scheduled_at"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![cutoff.to_rfc3339()], |row| Ok(appointment_row(row)))?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row??)?);
    }
    Ok(appointments)
}

// Internal row type for Appointment mapping
struct AppointmentRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    department: String,
    scheduled_at: String,
    status: String,
    reason: Option<String>,
    base_fee: f64,
    doctor_fee_pct: f64,
    department_fee_pct: f64,
    total_fee: i64,
    created_at: String,
    updated_at: String,
}

fn appointment_row(row: &rusqlite::Row<'_>) -> Result<AppointmentRow, rusqlite::Error> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        department: row.get(3)?,
        scheduled_at: row.get(4)?,
        status: row.get(5)?,
        reason: row.get(6)?,
        base_fee: row.get(7)?,
        doctor_fee_pct: row.get(8)?,
        department_fee_pct: row.get(9)?,
        total_fee: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid(&row.id)?,
        patient_id: parse_uuid(&row.patient_id)?,
        doctor_id: parse_uuid(&row.doctor_id)?,
        department: row.department,
        scheduled_at: parse_instant(&row.scheduled_at)?,
        status: AppointmentStatus::from_str(&row.status)?,
        reason: row.reason,
        base_fee: row.base_fee,
        doctor_fee_pct: row.doctor_fee_pct,
        department_fee_pct: row.department_fee_pct,
        total_fee: row.total_fee,
        created_at: parse_instant(&row.created_at)?,
        updated_at: parse_instant(&row.updated_at)?,
    })
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_instant(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad timestamp {s}: {e}")))
}
