//! Bearer authentication and per-IP rate limiting.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::api::error::ApiError;
use crate::persistence::users::{self, User};
use crate::state::AppState;

/// The authenticated, active user behind a request's bearer token.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let claims = state.tokens().decode(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::credentials()
        })?;

        let user = users::find_by_id(state.db().pool(), &claims.sub)
            .await?
            .ok_or_else(ApiError::credentials)?;

        if !user.is_active {
            return Err(ApiError::BadRequest("Inactive user".to_string()));
        }
        Ok(AuthUser(user))
    }
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Sliding one-second window per client IP.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, Vec<Instant>>>,
    last_cleanup: Arc<Mutex<Instant>>,
    cleanup_interval: Duration,
    max_rps: u32,
    enabled: bool,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(max_rps: u32, enabled: bool, trust_proxy: bool) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            cleanup_interval: Duration::from_secs(60),
            max_rps,
            enabled,
            trust_proxy,
        }
    }

    /// Check if request should be allowed. Returns true if allowed.
    pub fn check(&self, ip: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let window = Duration::from_secs(1);
        let do_cleanup = match self.last_cleanup.lock() {
            Ok(mut last_cleanup) if now.duration_since(*last_cleanup) >= self.cleanup_interval => {
                *last_cleanup = now;
                true
            }
            _ => false,
        };
        if do_cleanup {
            self.purge_stale_entries(now, window);
        }

        let mut entry = self.requests.entry(ip.to_string()).or_default();
        let timestamps = entry.value_mut();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() < self.max_rps as usize {
            timestamps.push(now);
            true
        } else {
            false
        }
    }

    fn purge_stale_entries(&self, now: Instant, window: Duration) {
        self.requests
            .retain(|_, stamps| stamps.iter().any(|t| now.duration_since(*t) < window));
    }

    fn client_ip(&self, request: &Request) -> String {
        let forwarded = if self.trust_proxy {
            request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        } else {
            None
        };

        forwarded
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rate limiting middleware for expensive endpoints.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&request);
    if limiter.check(&ip) {
        next.run(request).await
    } else {
        tracing::warn!(client = %ip, "Rate limit exceeded");
        ApiError::RateLimited.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn limiter_allows_up_to_max_per_second() {
        let limiter = RateLimiter::new(2, true, false);
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn disabled_limiter_allows_everything() {
        let limiter = RateLimiter::new(0, false, false);
        for _ in 0..10 {
            assert!(limiter.check("1.2.3.4"));
        }
    }

    #[test]
    fn forwarded_for_only_when_trusted() {
        let mut request = Request::new(axum::body::Body::empty());
        request
            .headers_mut()
            .insert("X-Forwarded-For", HeaderValue::from_static("9.9.9.9, 10.0.0.1"));

        assert_eq!(RateLimiter::new(1, true, true).client_ip(&request), "9.9.9.9");
        assert_eq!(RateLimiter::new(1, true, false).client_ip(&request), "unknown");
    }

    #[test]
    fn bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
