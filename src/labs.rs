//! Lab-test ordering and result flow.
//!
//! Lab tests have one extra hop compared to appointments: a test taken
//! at the slot ("test-taken") before a result lands ("completed").

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{
    department_fee_pct, get_available_lab_test, get_doctor, get_lab_test, get_patient,
    insert_lab_test, list_overdue_scheduled_lab_tests, no_show_grace_minutes,
    set_lab_test_result, set_lab_test_status,
};
use crate::db::DatabaseError;
use crate::fees;
use crate::lifecycle::{self, LifecycleError};
use crate::models::enums::{Audience, LabTestStatus, NotificationKind};
use crate::models::LabTest;
use crate::notify;

#[derive(Debug, Error)]
pub enum LabError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("invalid lab booking: {0}")]
    Validation(String),

    #[error("lab test is not offered")]
    TestNotOffered,

    #[error("{0}")]
    Gated(&'static str),
}

/// Request to book a lab test from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabBookingRequest {
    pub patient_id: Uuid,
    pub catalog_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub ordering_doctor_id: Option<Uuid>,
}

/// Book a lab test: resolve the catalog entry, snapshot the fee,
/// insert, notify the patient.
pub fn book_lab_test(
    conn: &Connection,
    req: &LabBookingRequest,
    now: DateTime<Utc>,
) -> Result<LabTest, LabError> {
    if req.scheduled_at <= now {
        return Err(LabError::Validation(
            "lab test must be scheduled for a future time".into(),
        ));
    }

    let patient = get_patient(conn, &req.patient_id)?;
    let entry = get_available_lab_test(conn, &req.catalog_id)?;
    if !entry.active {
        return Err(LabError::TestNotOffered);
    }

    // The ordering doctor's markup applies only when a doctor ordered
    // the test; walk-ins pay base plus the department markup.
    let doctor_pct = match req.ordering_doctor_id {
        Some(ref doctor_id) => get_doctor(conn, doctor_id)?.fee_percentage,
        None => 0.0,
    };
    let dept_pct = department_fee_pct(conn, &entry.department)?;
    if dept_pct < 0.0 {
        return Err(LabError::Validation(format!(
            "department fee percentage for {} is negative",
            entry.department
        )));
    }
    let fee = fees::compute_fee(entry.base_fee, doctor_pct, dept_pct);

    let test = LabTest {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        catalog_id: entry.id,
        test_name: entry.name.clone(),
        department: entry.department.clone(),
        ordering_doctor_id: req.ordering_doctor_id,
        scheduled_at: req.scheduled_at,
        status: LabTestStatus::Scheduled,
        result_summary: None,
        base_fee: fee.base,
        doctor_fee_pct: doctor_pct,
        department_fee_pct: dept_pct,
        total_fee: fee.total,
        created_at: now,
        updated_at: now,
    };
    insert_lab_test(conn, &test)?;

    notify::emit(
        conn,
        patient.id,
        Audience::Patient,
        NotificationKind::Booked,
        format!(
            "{} booked for {}",
            entry.name,
            req.scheduled_at.to_rfc3339()
        ),
        now,
    )?;

    tracing::info!(
        lab_test_id = %test.id,
        catalog_id = %entry.id,
        total_fee = test.total_fee,
        "Lab test booked"
    );
    Ok(test)
}

/// Mark a lab test as taken. Allowed only once the slot has arrived.
pub fn mark_test_taken(
    conn: &Connection,
    id: &Uuid,
    now: DateTime<Utc>,
) -> Result<LabTest, LabError> {
    let test = get_lab_test(conn, id)?;
    if !lifecycle::can_mark_taken(test.status, test.scheduled_at, now) {
        return Err(LabError::Gated(
            "lab test cannot be marked as taken yet",
        ));
    }
    lifecycle::validate_transition(test.status, LabTestStatus::TestTaken)?;
    set_lab_test_status(conn, id, LabTestStatus::TestTaken, now)?;

    tracing::info!(lab_test_id = %id, "Lab test marked as taken");
    get_lab_test(conn, id).map_err(LabError::from)
}

/// Attach a result to a taken test, completing it.
pub fn record_result(
    conn: &Connection,
    id: &Uuid,
    summary: &str,
    now: DateTime<Utc>,
) -> Result<LabTest, LabError> {
    let test = get_lab_test(conn, id)?;
    lifecycle::validate_transition(test.status, LabTestStatus::Completed)?;
    set_lab_test_result(conn, id, summary, now)?;

    notify::emit(
        conn,
        test.patient_id,
        Audience::Patient,
        NotificationKind::ResultReady,
        format!("Results are ready for {}", test.test_name),
        now,
    )?;

    tracing::info!(lab_test_id = %id, "Lab test result recorded");
    get_lab_test(conn, id).map_err(LabError::from)
}

/// Cancel a scheduled lab test before its slot.
pub fn cancel_lab_test(
    conn: &Connection,
    id: &Uuid,
    now: DateTime<Utc>,
) -> Result<LabTest, LabError> {
    let test = get_lab_test(conn, id)?;
    if !lifecycle::can_cancel(test.status, test.scheduled_at, now) {
        return Err(LabError::Gated("lab test can no longer be cancelled"));
    }
    lifecycle::validate_transition(test.status, LabTestStatus::Cancelled)?;
    set_lab_test_status(conn, id, LabTestStatus::Cancelled, now)?;

    notify::emit(
        conn,
        test.patient_id,
        Audience::Patient,
        NotificationKind::Cancelled,
        format!("{} was cancelled", test.test_name),
        now,
    )?;

    tracing::info!(lab_test_id = %id, "Lab test cancelled");
    get_lab_test(conn, id).map_err(LabError::from)
}

/// Sweep overdue scheduled lab tests to no-show.
pub fn sweep_no_shows(conn: &Connection, now: DateTime<Utc>) -> Result<usize, LabError> {
    let grace = no_show_grace_minutes(conn)?;
    let cutoff = now - Duration::minutes(grace);
    let candidates = list_overdue_scheduled_lab_tests(conn, cutoff)?;

    let mut swept = 0;
    for test in candidates {
        if let Some(next) = lifecycle::auto_transition(test.status, test.scheduled_at, now, grace)
        {
            set_lab_test_status(conn, &test.id, next, now)?;
            notify::emit(
                conn,
                test.patient_id,
                Audience::Patient,
                NotificationKind::StatusChanged,
                format!("{} marked as no-show", test.test_name),
                now,
            )?;
            swept += 1;
        }
    }

    if swept > 0 {
        tracing::info!(swept, "No-show sweep transitioned lab tests");
    }
    Ok(swept)
}
