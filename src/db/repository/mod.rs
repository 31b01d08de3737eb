//! Repository layer: entity-scoped database operations.
//!
//! Free functions over `rusqlite::Connection`, one sub-module per
//! entity. All public functions are re-exported here.

mod appointment;
mod audit;
mod catalog;
mod doctor;
mod notification;
mod patient;
mod setting;

pub use appointment::*;
pub use audit::*;
pub use catalog::*;
pub use doctor::*;
pub use lab_test::*;
pub use notification::*;
pub use patient::*;
pub use setting::*;
