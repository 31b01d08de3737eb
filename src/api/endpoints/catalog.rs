//! Lab-test catalog endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::AvailableLabTest;

#[derive(Serialize)]
pub struct CatalogResponse {
    pub catalog: Vec<AvailableLabTest>,
}

/// `GET /api/catalog` — active catalog entries.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<CatalogResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let catalog = repository::list_active_lab_tests(&conn)?;
    ctx.core.log_access("list", "catalog");

    Ok(Json(CatalogResponse { catalog }))
}

#[derive(Deserialize)]
pub struct CreateCatalogRequest {
    pub name: String,
    pub code: Option<String>,
    pub department: String,
    pub base_fee: f64,
}

/// `POST /api/catalog` — add an offered test.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateCatalogRequest>,
) -> Result<Json<AvailableLabTest>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("test name is required".into()));
    }
    if req.base_fee < 0.0 {
        return Err(ApiError::BadRequest("base fee must be non-negative".into()));
    }

    let conn = ctx.core.open_db()?;
    let entry = AvailableLabTest {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        code: req.code.map(|c| c.trim().to_uppercase()),
        department: req.department.trim().to_string(),
        base_fee: req.base_fee,
        active: true,
    };
    repository::insert_available_lab_test(&conn, &entry)?;
    ctx.core.log_access("create", "catalog_entry");

    Ok(Json(entry))
}

/// `DELETE /api/catalog/:id` — deactivate an offered test.
/// Existing bookings keep their snapshotted fees.
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailableLabTest>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::deactivate_lab_test(&conn, &id)?;
    let entry = repository::get_available_lab_test(&conn, &id)?;
    ctx.core.log_access("deactivate", "catalog_entry");

    Ok(Json(entry))
}
