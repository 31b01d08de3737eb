//! Appointment endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::booking::{self, BookingRequest};
use crate::db::repository;
use crate::models::{Appointment, AppointmentFilter};

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

/// `GET /api/appointments` — list with optional filters.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = repository::list_appointments(&conn, &filter)?;
    ctx.core.log_access("list", "appointments");

    Ok(Json(AppointmentsResponse { appointments }))
}

/// `POST /api/appointments` — book an appointment.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = booking::book_appointment(&conn, &req, Utc::now())?;
    ctx.core.log_access("create", "appointment");

    Ok(Json(appointment))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = repository::get_appointment(&conn, &id)?;
    ctx.core.log_access("read", "appointment");

    Ok(Json(appointment))
}

/// `POST /api/appointments/:id/cancel`
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = booking::cancel_appointment(&conn, &id, Utc::now())?;
    ctx.core.log_access("cancel", "appointment");

    Ok(Json(appointment))
}

/// `POST /api/appointments/:id/complete`
pub async fn complete(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = booking::complete_appointment(&conn, &id, Utc::now())?;
    ctx.core.log_access("complete", "appointment");

    Ok(Json(appointment))
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub swept: usize,
}

/// `POST /api/appointments/sweep` — run the no-show sweep.
pub async fn sweep(State(ctx): State<ApiContext>) -> Result<Json<SweepResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let swept = booking::sweep_no_shows(&conn, Utc::now())?;
    ctx.core.log_access("sweep", "appointments");

    Ok(Json(SweepResponse { swept }))
}
