//! Patient endpoints.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::Patient;

#[derive(Serialize)]
pub struct PatientsResponse {
    pub patients: Vec<Patient>,
}

/// `GET /api/patients` — list all patients.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<PatientsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patients = repository::get_all_patients(&conn)?;
    ctx.core.log_access("list", "patients");

    Ok(Json(PatientsResponse { patients }))
}

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// `POST /api/patients` — register a patient.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("patient name is required".into()));
    }

    let conn = ctx.core.open_db()?;
    let patient = Patient {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email: req.email,
        phone: req.phone,
        date_of_birth: req.date_of_birth,
    };
    repository::insert_patient(&conn, &patient)?;
    ctx.core.log_access("create", "patient");

    Ok(Json(patient))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patient = repository::get_patient(&conn, &id)?;
    ctx.core.log_access("read", "patient");

    Ok(Json(patient))
}

#[derive(Deserialize)]
pub struct UpdateContactRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// `PUT /api/patients/:id/contact` — update contact details.
pub async fn update_contact(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::update_patient_contact(&conn, &id, req.email.as_deref(), req.phone.as_deref())?;
    let patient = repository::get_patient(&conn, &id)?;
    ctx.core.log_access("update", "patient");

    Ok(Json(patient))
}
