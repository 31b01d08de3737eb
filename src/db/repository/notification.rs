use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::appointment::{parse_instant, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::{Audience, NotificationKind};
use crate::models::Notification;

pub fn insert_notification(conn: &Connection, note: &Notification) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (id, recipient_id, audience, kind, message, read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            note.id.to_string(),
            note.recipient_id.to_string(),
            note.audience.as_str(),
            note.kind.as_str(),
            note.message,
            note.read,
            note.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Notifications for one recipient, unread first, newest first within
/// each group.
pub fn list_notifications_for(
    conn: &Connection,
    recipient_id: &Uuid,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient_id, audience, kind, message, read, created_at
         FROM notifications WHERE recipient_id = ?1
         ORDER BY read, created_at DESC",
    )?;
    let rows = stmt.query_map(params![recipient_id.to_string()], |row| {
        Ok(notification_row(row))
    })?;

    let mut notes = Vec::new();
    for row in rows {
        notes.push(notification_from_row(row??)?);
    }
    Ok(notes)
}

pub fn mark_notification_read(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE notifications SET read = 1 WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "notification".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

struct NotificationRow {
    id: String,
    recipient_id: String,
    audience: String,
    kind: String,
    message: String,
    read: bool,
    created_at: String,
}

fn notification_row(row: &rusqlite::Row<'_>) -> Result<NotificationRow, rusqlite::Error> {
    Ok(NotificationRow {
        id: row.get(0)?,
        recipient_id: row.get(1)?,
        audience: row.get(2)?,
        kind: row.get(3)?,
        message: row.get(4)?,
        read: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn notification_from_row(row: NotificationRow) -> Result<Notification, DatabaseError> {
    Ok(Notification {
        id: parse_uuid(&row.id)?,
        recipient_id: parse_uuid(&row.recipient_id)?,
        audience: Audience::from_str(&row.audience)?,
        kind: NotificationKind::from_str(&row.kind)?,
        message: row.message,
        read: row.read,
        created_at: parse_instant(&row.created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::{TimeZone, Utc};

    fn sample(recipient: Uuid, minute: u32) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: recipient,
            audience: Audience::Patient,
            kind: NotificationKind::Booked,
            message: "Appointment booked".into(),
            read: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn list_is_scoped_to_recipient() {
        let conn = open_memory_database().unwrap();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        insert_notification(&conn, &sample(a, 0)).unwrap();
        insert_notification(&conn, &sample(b, 1)).unwrap();

        assert_eq!(list_notifications_for(&conn, &a).unwrap().len(), 1);
        assert_eq!(list_notifications_for(&conn, &b).unwrap().len(), 1);
    }

    #[test]
    fn unread_sort_before_read() {
        let conn = open_memory_database().unwrap();
        let recipient = Uuid::new_v4();
        let older = sample(recipient, 0);
        let newer = sample(recipient, 5);
        insert_notification(&conn, &older).unwrap();
        insert_notification(&conn, &newer).unwrap();

        mark_notification_read(&conn, &newer.id).unwrap();

        let notes = list_notifications_for(&conn, &recipient).unwrap();
        assert_eq!(notes[0].id, older.id);
        assert!(!notes[0].read);
        assert!(notes[1].read);
    }

    #[test]
    fn mark_unknown_notification_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = mark_notification_read(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
