//! Service info and health probes.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::{API_PREFIX, APP_NAME};
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": APP_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "health": format!("{API_PREFIX}/health"),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(state.db().pool()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "unavailable"
        }
    };
    let status = if database == "ok" { "healthy" } else { "degraded" };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config().environment,
        "database": database,
        "providers": if state.providers_configured() { "mapbox" } else { "offline" },
    }))
}
