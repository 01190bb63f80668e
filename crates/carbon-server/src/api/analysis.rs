//! On-demand route analysis without persistence.

use axum::{extract::State, Json};
use carbon_core::{RouteAnalysis, RouteRequest};
use serde::Serialize;
use std::sync::Arc;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiJson};
use crate::state::AppState;

/// The request echoed back alongside everything computed for it.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub request: RouteRequest,
    #[serde(flatten)]
    pub analysis: RouteAnalysis,
}

pub async fn compute_routes(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let analysis = analyse(&state, &request).await?;
    tracing::info!(
        user_id = %user.id,
        shortest = %analysis.shortest_route.transport_mode,
        efficient = %analysis.efficient_route.transport_mode,
        "Computed routes"
    );
    Ok(Json(RouteResponse { request, analysis }))
}

/// Run the synthesizer, mapping its errors onto HTTP statuses.
pub(crate) async fn analyse(
    state: &AppState,
    request: &RouteRequest,
) -> Result<RouteAnalysis, ApiError> {
    tracing::debug!(
        origin = %request.origin_name,
        destination = %request.destination_name,
        weight_kg = request.weight_kg,
        "Computing routes"
    );
    Ok(state.synthesizer().compute_all_routes(request).await?)
}
