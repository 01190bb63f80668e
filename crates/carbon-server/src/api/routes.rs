//! Router assembly.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::auth::{self, RateLimiter};
use crate::api::{analysis, emissions, health, request_id, searches, users};
use crate::config::{Config, API_PREFIX};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let search_limiter = RateLimiter::new(
        config.search_rate_limit_rps,
        config.rate_limit_enabled,
        config.trust_proxy,
    );

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::health_detailed));

    let auth_routes = Router::new()
        .route("/auth/register", post(users::register))
        .route("/auth/token", post(users::login))
        .route("/auth/me", get(users::me));

    let emission_routes = Router::new()
        .route("/emissions/calculate", post(emissions::calculate))
        .route("/emissions/factors", get(emissions::factors))
        .route("/emissions/compare", get(emissions::compare));

    let route_routes = Router::new().route("/routes/compute", post(analysis::compute_routes));

    // Rate limit covers search creation only.
    let search_routes = Router::new()
        .route(
            "/searches",
            post(searches::create_search)
                .layer(middleware::from_fn_with_state(search_limiter, auth::rate_limit))
                .get(searches::list_searches)
                .delete(searches::delete_all_searches),
        )
        .route(
            "/searches/:id",
            get(searches::get_search).delete(searches::delete_search),
        );

    let api = health_routes
        .merge(auth_routes)
        .merge(emission_routes)
        .merge(route_routes)
        .merge(search_routes);

    Router::new()
        .route("/", get(health::root))
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
