use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry in the orderable lab-test catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableLabTest {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub department: String,
    pub base_fee: f64,
    pub active: bool,
}
