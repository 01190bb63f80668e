//! Bearer token minting for the carbon server.
//!
//! Tokens are HS256-signed with the server's `CARBON_JWT_SECRET`; the server
//! still looks the user up by `sub`, so the id must belong to a real account.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// JWT claims understood by the server.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    email: String,
    /// Expiration time (Unix timestamp)
    exp: i64,
    /// Issued at (Unix timestamp)
    iat: i64,
}

/// Configuration for token generation.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub user_id: String,
    pub email: String,
    /// Shared signing secret
    pub secret: String,
    /// Token validity in minutes
    pub expiry_minutes: i64,
}

/// Generate a signed bearer token.
///
/// # Example
/// ```
/// use carbon_cli::auth::{generate_token, TokenConfig};
///
/// let token = generate_token(&TokenConfig {
///     user_id: "3f1c9a52-0000-4000-8000-000000000001".to_string(),
///     email: "ops@example.com".to_string(),
///     secret: "shared-secret".to_string(),
///     expiry_minutes: 30,
/// })
/// .unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn generate_token(config: &TokenConfig) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: config.user_id.clone(),
        email: config.email.clone(),
        exp: (now + Duration::minutes(config.expiry_minutes.max(1))).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
