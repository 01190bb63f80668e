//! HTTP API for the carbon server.

pub mod analysis;
pub mod auth;
pub mod emissions;
pub mod error;
pub mod health;
pub mod request_id;
mod routes;
pub mod searches;
pub mod users;

use crate::config::Config;
use axum::Router;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}

#[cfg(test)]
mod tests;
