//! Appointment booking and lifecycle mutations.
//!
//! This is the logic every portal screen used to re-implement inline:
//! fee snapshot at booking, wall-clock gates, and the status
//! transitions, all in one place, over the repositories.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{
    department_fee_pct, get_appointment, get_doctor, get_patient, insert_appointment,
    list_overdue_scheduled_appointments, no_show_grace_minutes, set_appointment_status,
};
use crate::db::DatabaseError;
use crate::fees;
use crate::lifecycle::{self, LifecycleError};
use crate::models::enums::{AppointmentStatus, Audience, NotificationKind};
use crate::models::Appointment;
use crate::notify;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("invalid booking: {0}")]
    Validation(String),

    #[error("doctor is not accepting bookings")]
    DoctorUnavailable,

    #[error("{0}")]
    Gated(&'static str),
}

/// Request to book an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub base_fee: f64,
}

/// Book an appointment: validate, snapshot the fee, insert, notify.
pub fn book_appointment(
    conn: &Connection,
    req: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    if req.scheduled_at <= now {
        return Err(BookingError::Validation(
            "appointment must be scheduled for a future time".into(),
        ));
    }
    if req.base_fee < 0.0 {
        return Err(BookingError::Validation("base fee must be non-negative".into()));
    }

    let patient = get_patient(conn, &req.patient_id)?;
    let doctor = get_doctor(conn, &req.doctor_id)?;
    if !doctor.available {
        return Err(BookingError::DoctorUnavailable);
    }

    let dept_pct = department_fee_pct(conn, &doctor.department)?;
    if dept_pct < 0.0 {
        return Err(BookingError::Validation(format!(
            "department fee percentage for {} is negative",
            doctor.department
        )));
    }
    let fee = fees::compute_fee(req.base_fee, doctor.fee_percentage, dept_pct);

    let appt = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        doctor_id: doctor.id,
        department: doctor.department.clone(),
        scheduled_at: req.scheduled_at,
        status: AppointmentStatus::Scheduled,
        reason: req.reason.clone(),
        base_fee: fee.base,
        doctor_fee_pct: doctor.fee_percentage,
        department_fee_pct: dept_pct,
        total_fee: fee.total,
        created_at: now,
        updated_at: now,
    };
    insert_appointment(conn, &appt)?;

    let slot = req.scheduled_at.to_rfc3339();
    notify::emit(
        conn,
        patient.id,
        Audience::Patient,
        NotificationKind::Booked,
        format!("Appointment with {} booked for {slot}", doctor.name),
        now,
    )?;
    notify::emit(
        conn,
        doctor.id,
        Audience::Doctor,
        NotificationKind::Booked,
        format!("New appointment with {} at {slot}", patient.name),
        now,
    )?;

    tracing::info!(
        appointment_id = %appt.id,
        doctor_id = %doctor.id,
        total_fee = appt.total_fee,
        "Appointment booked"
    );
    Ok(appt)
}

/// Cancel a scheduled appointment before its slot.
pub fn cancel_appointment(
    conn: &Connection,
    id: &Uuid,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    let appt = get_appointment(conn, id)?;
    if !lifecycle::can_cancel(appt.status, appt.scheduled_at, now) {
        return Err(BookingError::Gated(
            "appointment can no longer be cancelled",
        ));
    }
    lifecycle::validate_transition(appt.status, AppointmentStatus::Cancelled)?;
    set_appointment_status(conn, id, AppointmentStatus::Cancelled, now)?;

    notify::emit(
        conn,
        appt.patient_id,
        Audience::Patient,
        NotificationKind::Cancelled,
        format!("Appointment on {} was cancelled", appt.scheduled_at.to_rfc3339()),
        now,
    )?;

    tracing::info!(appointment_id = %id, "Appointment cancelled");
    get_appointment(conn, id).map_err(BookingError::from)
}

/// Mark a past appointment as completed.
pub fn complete_appointment(
    conn: &Connection,
    id: &Uuid,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    let appt = get_appointment(conn, id)?;
    if now < appt.scheduled_at {
        return Err(BookingError::Gated(
            "appointment cannot be completed before its slot",
        ));
    }
    lifecycle::validate_transition(appt.status, AppointmentStatus::Completed)?;
    set_appointment_status(conn, id, AppointmentStatus::Completed, now)?;

    tracing::info!(appointment_id = %id, "Appointment completed");
    get_appointment(conn, id).map_err(BookingError::from)
}

/// Sweep overdue scheduled appointments to no-show. Returns the number
/// of rows transitioned.
pub fn sweep_no_shows(conn: &Connection, now: DateTime<Utc>) -> Result<usize, BookingError> {
    let grace = no_show_grace_minutes(conn)?;
    // Candidates are anything scheduled before the grace cutoff.
    let cutoff = now - Duration::minutes(grace);
    let candidates = list_overdue_scheduled_appointments(conn, cutoff)?;

    let mut swept = 0;
    for appt in candidates {
        if let Some(next) = lifecycle::auto_transition(appt.status, appt.scheduled_at, now, grace)
        {
            set_appointment_status(conn, &appt.id, next, now)?;
            notify::emit(
                conn,
                appt.patient_id,
                Audience::Patient,
                NotificationKind::StatusChanged,
                format!(
                    "Appointment on {} marked as no-show",
                    appt.scheduled_at.to_rfc3339()
                ),
                now,
            )?;
            swept += 1;
        }
    }

    if swept > 0 {
        tracing::info!(swept, "No-show sweep transitioned appointments");
    }
    Ok(swept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_doctor, insert_patient, set_setting};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Doctor, Patient};
    use chrono::TimeZone;

    fn seed(conn: &Connection) -> (Uuid, Uuid) {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: None,
            phone: None,
            date_of_birth: None,
        };
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. Rao".into(),
            department: "cardiology".into(),
            fee_percentage: 10.0,
            available: true,
        };
        insert_patient(conn, &patient).unwrap();
        insert_doctor(conn, &doctor).unwrap();
        (patient.id, doctor.id)
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn request(pid: Uuid, did: Uuid) -> BookingRequest {
        BookingRequest {
            patient_id: pid,
            doctor_id: did,
            scheduled_at: at(14, 10),
            reason: Some("chest pain follow-up".into()),
            base_fee: 1000.0,
        }
    }

    #[test]
    fn booking_snapshots_fee_and_notifies() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        set_setting(&conn, "department_fee_pct.cardiology", "5").unwrap();

        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();
        assert_eq!(appt.total_fee, 1150);
        assert_eq!(appt.doctor_fee_pct, 10.0);
        assert_eq!(appt.department_fee_pct, 5.0);
        assert_eq!(appt.status, AppointmentStatus::Scheduled);

        // Both parties notified
        let patient_notes =
            crate::db::repository::list_notifications_for(&conn, &pid).unwrap();
        let doctor_notes =
            crate::db::repository::list_notifications_for(&conn, &did).unwrap();
        assert_eq!(patient_notes.len(), 1);
        assert_eq!(doctor_notes.len(), 1);
    }

    #[test]
    fn negative_department_pct_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        set_setting(&conn, "department_fee_pct.cardiology", "-50").unwrap();

        let err = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn booking_in_the_past_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        let mut req = request(pid, did);
        req.scheduled_at = at(1, 8);

        let err = book_appointment(&conn, &req, at(1, 9)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn unavailable_doctor_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        crate::db::repository::set_doctor_availability(&conn, &did, false).unwrap();

        let err = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap_err();
        assert!(matches!(err, BookingError::DoctorUnavailable));
    }

    #[test]
    fn unknown_patient_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (_, did) = seed(&conn);
        let req = request(Uuid::new_v4(), did);

        let err = book_appointment(&conn, &req, at(1, 9)).unwrap_err();
        assert!(matches!(err, BookingError::Database(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn cancel_before_slot_succeeds() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();

        let cancelled = cancel_appointment(&conn, &appt.id, at(13, 9)).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn cancel_after_slot_is_gated() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();

        let err = cancel_appointment(&conn, &appt.id, at(14, 11)).unwrap_err();
        assert!(matches!(err, BookingError::Gated(_)));
    }

    #[test]
    fn cancel_twice_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();

        cancel_appointment(&conn, &appt.id, at(13, 9)).unwrap();
        let err = cancel_appointment(&conn, &appt.id, at(13, 10)).unwrap_err();
        // Terminal state fails the gate, not the transition table
        assert!(matches!(err, BookingError::Gated(_)));
    }

    #[test]
    fn complete_before_slot_is_gated() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();

        let err = complete_appointment(&conn, &appt.id, at(14, 9)).unwrap_err();
        assert!(matches!(err, BookingError::Gated(_)));

        let done = complete_appointment(&conn, &appt.id, at(14, 11)).unwrap();
        assert_eq!(done.status, AppointmentStatus::Completed);
    }

    #[test]
    fn sweep_marks_only_past_grace() {
        let conn = open_memory_database().unwrap();
        let (pid, did) = seed(&conn);
        set_setting(&conn, "no_show_grace_minutes", "30").unwrap();

        let appt = book_appointment(&conn, &request(pid, did), at(1, 9)).unwrap();

        // 20 minutes past the slot: inside grace, nothing swept
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 10, 20, 0).unwrap();
        assert_eq!(sweep_no_shows(&conn, now).unwrap(), 0);

        // 31 minutes past: swept
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 10, 31, 0).unwrap();
        assert_eq!(sweep_no_shows(&conn, now).unwrap(), 1);
        let loaded = get_appointment(&conn, &appt.id).unwrap();
        assert_eq!(loaded.status, AppointmentStatus::NoShow);

        // Sweep is idempotent
        assert_eq!(sweep_no_shows(&conn, now).unwrap(), 0);
    }
}
