//! Doctor endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::Doctor;

#[derive(Deserialize)]
pub struct DoctorQuery {
    pub department: Option<String>,
}

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
}

/// `GET /api/doctors` — list doctors, optionally by department.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let doctors = repository::get_doctors(&conn, query.department.as_deref())?;
    ctx.core.log_access("list", "doctors");

    Ok(Json(DoctorsResponse { doctors }))
}

#[derive(Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub department: String,
    pub fee_percentage: f64,
}

/// `POST /api/doctors` — register a doctor. New doctors start available.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateDoctorRequest>,
) -> Result<Json<Doctor>, ApiError> {
    if req.name.trim().is_empty() || req.department.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "doctor name and department are required".into(),
        ));
    }
    if req.fee_percentage < 0.0 {
        return Err(ApiError::BadRequest(
            "fee percentage must be non-negative".into(),
        ));
    }

    let conn = ctx.core.open_db()?;
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        department: req.department.trim().to_string(),
        fee_percentage: req.fee_percentage,
        available: true,
    };
    repository::insert_doctor(&conn, &doctor)?;
    ctx.core.log_access("create", "doctor");

    Ok(Json(doctor))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.core.open_db()?;
    let doctor = repository::get_doctor(&conn, &id)?;
    ctx.core.log_access("read", "doctor");

    Ok(Json(doctor))
}

#[derive(Deserialize)]
pub struct FeeRequest {
    pub fee_percentage: f64,
}

/// `PUT /api/doctors/:id/fee` — reprice a doctor. Existing bookings
/// keep their snapshotted percentages.
pub async fn update_fee(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<FeeRequest>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::update_doctor_fee_percentage(&conn, &id, req.fee_percentage)?;
    let doctor = repository::get_doctor(&conn, &id)?;
    ctx.core.log_access("update", "doctor");

    Ok(Json(doctor))
}

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

/// `PUT /api/doctors/:id/availability` — toggle bookability.
pub async fn set_availability(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::set_doctor_availability(&conn, &id, req.available)?;
    let doctor = repository::get_doctor(&conn, &id)?;
    ctx.core.log_access("update", "doctor");

    Ok(Json(doctor))
}
