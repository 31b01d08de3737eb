//! API endpoint handlers.
//!
//! Each module corresponds to one entity or flow. Handlers stay thin:
//! open a connection, call into the service or repository layer, map
//! errors, record the access.

pub mod appointments;
pub mod catalog;
pub mod doctors;
pub mod fees;
pub mod health;
pub mod notifications;
pub mod patients;
pub mod settings;
