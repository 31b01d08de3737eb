use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    /// Markup percentage added on top of the base fee for this doctor.
    pub fee_percentage: f64,
    pub available: bool,
}
