//! Notification emission shared by the booking and lab workflows.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::insert_notification;
use crate::db::DatabaseError;
use crate::models::enums::{Audience, NotificationKind};
use crate::models::Notification;

/// Insert a notification row for one recipient.
pub fn emit(
    conn: &Connection,
    recipient_id: Uuid,
    audience: Audience,
    kind: NotificationKind,
    message: impl Into<String>,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let note = Notification {
        id: Uuid::new_v4(),
        recipient_id,
        audience,
        kind,
        message: message.into(),
        read: false,
        created_at: now,
    };
    insert_notification(conn, &note)
}
