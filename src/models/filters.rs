use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::enums::{AppointmentStatus, LabTestStatus};

/// Query filter for appointment listings. All fields optional and ANDed.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Query filter for lab-test listings.
#[derive(Debug, Default, Deserialize)]
pub struct LabTestFilter {
    pub patient_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<LabTestStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
