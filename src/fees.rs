//! Fee calculation: the one formula every booking form used to
//! re-implement inline.
//!
//! `total = round(base + base * doctor_pct / 100 + base * dept_pct / 100)`
//!
//! Markups are kept as separate currency amounts so receipts can show
//! the breakdown; only the final total is rounded to a whole unit.

use serde::{Deserialize, Serialize};

/// Itemized fee for a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base: f64,
    pub doctor_markup: f64,
    pub department_markup: f64,
    /// Whole-unit total, rounded half away from zero.
    pub total: i64,
}

/// Compute the itemized fee from a base charge and two markup percentages.
pub fn compute_fee(base: f64, doctor_pct: f64, dept_pct: f64) -> FeeBreakdown {
    let doctor_markup = base * doctor_pct / 100.0;
    let department_markup = base * dept_pct / 100.0;
    let total = (base + doctor_markup + department_markup).round() as i64;
    FeeBreakdown {
        base,
        doctor_markup,
        department_markup,
        total,
    }
}
