//! Notification endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::Notification;

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub recipient: Uuid,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// `GET /api/notifications?recipient=…` — unread first, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let notifications = repository::list_notifications_for(&conn, &query.recipient)?;
    ctx.core.log_access("list", "notifications");

    Ok(Json(NotificationsResponse { notifications }))
}

#[derive(Serialize)]
pub struct ReadResponse {
    pub read: bool,
}

/// `POST /api/notifications/:id/read`
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReadResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::mark_notification_read(&conn, &id)?;
    ctx.core.log_access("mark_read", "notification");

    Ok(Json(ReadResponse { read: true }))
}
