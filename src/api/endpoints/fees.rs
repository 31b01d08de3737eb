//! Fee quote endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::fees::{self, FeeBreakdown};

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub base: f64,
    #[serde(default)]
    pub doctor_pct: f64,
    #[serde(default)]
    pub dept_pct: f64,
}

/// `GET /api/fees/quote` — preview a total without booking anything.
pub async fn quote(
    State(_ctx): State<ApiContext>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<FeeBreakdown>, ApiError> {
    let inputs = [query.base, query.doctor_pct, query.dept_pct];
    if inputs.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ApiError::BadRequest(
            "fee inputs must be finite and non-negative".into(),
        ));
    }

    Ok(Json(fees::compute_fee(
        query.base,
        query.doctor_pct,
        query.dept_pct,
    )))
}
