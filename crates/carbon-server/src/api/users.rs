//! Account registration, token issuance and the current-user endpoint.

use anyhow::{anyhow, Context};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiForm, ApiJson};
use crate::persistence::users::{self, User};
use crate::security;
use crate::state::AppState;

const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=128;
const FULL_NAME_LEN: std::ops::RangeInclusive<usize> = 1..=100;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !is_plausible_email(&self.email) {
            return Err(ApiError::Validation("email is not a valid email address".to_string()));
        }
        if !PASSWORD_LEN.contains(&self.password.chars().count()) {
            return Err(ApiError::Validation(
                "password must be between 8 and 128 characters".to_string(),
            ));
        }
        if !FULL_NAME_LEN.contains(&self.full_name.trim().chars().count()) {
            return Err(ApiError::Validation(
                "full_name must be between 1 and 100 characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// OAuth2 password-grant form; `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    body.validate()?;

    let pool = state.db().pool();
    if users::find_by_email(pool, &body.email).await?.is_some() {
        return Err(duplicate(&body.email));
    }

    let password = body.password;
    let hashed = tokio::task::spawn_blocking(move || security::hash_password(&password))
        .await
        .context("password hashing task failed")?
        .map_err(|e| anyhow!("hashing password: {e}"))?;

    let user = users::create_user(pool, &body.email, &hashed, &body.full_name)
        .await?
        .ok_or_else(|| duplicate(&body.email))?;
    tracing::info!(user_id = %user.id, "Registered user");

    let response = token_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiForm(form): ApiForm<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Incorrect email or password".to_string());

    let user = users::find_by_email(state.db().pool(), &form.username)
        .await?
        .ok_or_else(invalid)?;

    let password = form.password;
    let stored = user.hashed_password.clone();
    let verified = tokio::task::spawn_blocking(move || security::verify_password(&password, &stored))
        .await
        .context("password verification task failed")?;

    if !verified || !user.is_active {
        return Err(invalid());
    }

    Ok(Json(token_response(&state, user)?))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

fn token_response(state: &AppState, user: User) -> Result<TokenResponse, ApiError> {
    let access_token = state
        .tokens()
        .issue(&user.id, &user.email)
        .context("signing access token")?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        user: user.into(),
    })
}

fn duplicate(email: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "User with email {} already exists",
        users::normalize_email(email)
    ))
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_plausible_email("ada@example.com"));
        assert!(is_plausible_email(" ada@mail.example.co.uk "));
        assert!(!is_plausible_email("ada"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ada@localhost"));
        assert!(!is_plausible_email("ada@@example.com"));
        assert!(!is_plausible_email("a da@example.com"));
    }

    #[test]
    fn register_request_bounds() {
        let mut req = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "12345678".to_string(),
            full_name: "Ada".to_string(),
        };
        assert!(req.validate().is_ok());

        req.password = "1234567".to_string();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));

        req.password = "x".repeat(129);
        assert!(req.validate().is_err());

        req.password = "12345678".to_string();
        req.full_name = "   ".to_string();
        assert!(req.validate().is_err());
    }
}
