//! Stand-alone emission estimates.

use axum::{extract::State, Json};
use carbon_core::{EmissionComparison, EmissionFactorInfo, EmissionResult, TransportMode};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmissionRequest {
    pub distance_km: f64,
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub distance_km: f64,
    pub weight_kg: f64,
}

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(body): ApiJson<EmissionRequest>,
) -> Result<Json<EmissionResult>, ApiError> {
    require_positive("distance_km", body.distance_km)?;
    require_positive("weight_kg", body.weight_kg)?;
    let result = state
        .calculator()
        .calculate(body.distance_km, body.weight_kg, body.transport_mode)?;
    Ok(Json(result))
}

pub async fn factors(State(state): State<Arc<AppState>>, _user: AuthUser) -> Json<Vec<EmissionFactorInfo>> {
    Json(state.calculator().factors_info())
}

pub async fn compare(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiQuery(query): ApiQuery<CompareQuery>,
) -> Result<Json<EmissionComparison>, ApiError> {
    require_positive("distance_km", query.distance_km)?;
    require_positive("weight_kg", query.weight_kg)?;
    Ok(Json(
        state
            .calculator()
            .compare_modes(query.distance_km, query.weight_kg)?,
    ))
}

fn require_positive(field: &str, value: f64) -> Result<(), ApiError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("{field} must be greater than zero")))
    }
}
