//! Settings endpoints, a flat key-value store.
//!
//! Keys in use: `no_show_grace_minutes` and
//! `department_fee_pct.<department>`.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;

#[derive(Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: Option<String>,
}

/// `GET /api/settings/:key`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let value = repository::get_setting(&conn, &key)?;
    ctx.core.log_access("read", "setting");

    Ok(Json(SettingResponse { key, value }))
}

#[derive(Deserialize)]
pub struct PutSettingRequest {
    pub value: String,
}

/// `PUT /api/settings/:key` — upsert.
pub async fn put(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
    Json(req): Json<PutSettingRequest>,
) -> Result<Json<SettingResponse>, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::BadRequest("setting key is required".into()));
    }

    let conn = ctx.core.open_db()?;
    repository::set_setting(&conn, &key, &req.value)?;
    ctx.core.log_access("update", "setting");

    Ok(Json(SettingResponse {
        key,
        value: Some(req.value),
    }))
}
