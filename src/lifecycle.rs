//! Status lifecycle: a single transition-validating function instead of
//! the per-screen boolean predicates the portals used to duplicate.
//!
//! Appointments: `scheduled → {completed, cancelled, no-show}`.
//! Lab tests:    `scheduled → {test-taken, no-show, cancelled}`,
//!               `test-taken → completed`.
//! `completed`, `cancelled` and `no-show` are terminal.
//!
//! Wall-clock gates (`can_mark_taken`, `can_cancel`) take `now` as a
//! parameter so callers and tests control the clock.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::enums::{AppointmentStatus, LabTestStatus};

#[derive(Debug, Error, PartialEq)]
pub enum LifecycleError {
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
}

/// Statuses that know their own allowed transitions.
pub trait StatusLifecycle: Sized + Copy + PartialEq + 'static {
    const SCHEDULED: Self;
    const NO_SHOW: Self;

    fn valid_transitions(&self) -> &'static [Self];

    fn as_status_str(&self) -> &'static str;

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl StatusLifecycle for AppointmentStatus {
    const SCHEDULED: Self = Self::Scheduled;
    const NO_SHOW: Self = Self::NoShow;

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[Self::Completed, Self::Cancelled, Self::NoShow],
            Self::Completed | Self::Cancelled | Self::NoShow => &[],
        }
    }

    fn as_status_str(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusLifecycle for LabTestStatus {
    const SCHEDULED: Self = Self::Scheduled;
    const NO_SHOW: Self = Self::NoShow;

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[Self::TestTaken, Self::NoShow, Self::Cancelled],
            Self::TestTaken => &[Self::Completed],
            Self::NoShow | Self::Completed | Self::Cancelled => &[],
        }
    }

    fn as_status_str(&self) -> &'static str {
        self.as_str()
    }
}

/// Validate a status transition. Every mutation path goes through here.
pub fn validate_transition<S: StatusLifecycle>(current: S, next: S) -> Result<(), LifecycleError> {
    if current.valid_transitions().contains(&next) {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition {
            from: current.as_status_str(),
            to: next.as_status_str(),
        })
    }
}

/// True iff the test is still scheduled and its slot has arrived.
pub fn can_mark_taken(
    status: LabTestStatus,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status == LabTestStatus::Scheduled && now >= scheduled_at
}

/// True iff the entry is not in a terminal state and the slot has not
/// yet arrived.
pub fn can_cancel<S: StatusLifecycle>(
    status: S,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    !status.is_terminal() && now < scheduled_at
}

/// Time-driven transition: a scheduled entry whose slot is more than
/// `grace_minutes` in the past becomes a no-show. Returns `None` when
/// nothing should change. Applied only by the explicit sweep operations,
/// never silently inside reads.
pub fn auto_transition<S: StatusLifecycle>(
    status: S,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
    grace_minutes: i64,
) -> Option<S> {
    if status != S::SCHEDULED {
        return None;
    }
    let threshold = scheduled_at + Duration::minutes(grace_minutes);
    if now > threshold {
        Some(S::NO_SHOW)
    } else {
        None
    }
}
