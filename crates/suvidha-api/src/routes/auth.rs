//! # Authentication API
//!
//! Email-keyed accounts with HS256 bearer tokens. The identity check is
//! mocked: login does not verify the password and registers unknown
//! emails on the fly.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ApiResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, UserRecord};
use crate::store::StoreError;

// ── Request/Response DTOs ─────────────────────────────────────────

/// Register a new account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("password must not be empty".to_string());
        }
        Ok(())
    }
}

/// Log in with email and password.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email must be a valid address".to_string()),
    }
}

/// User summary embedded in the login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenUser {
    pub id: Uuid,
    /// Phone number, or the email for accounts without one.
    pub phone: String,
    pub email: String,
    pub consumer_id: Option<String>,
    pub full_name: Option<String>,
    pub language_preference: String,
}

/// Issued access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: TokenUser,
}

/// The caller's profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub email: String,
    pub city_zone: Option<String>,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            full_name: user.full_name,
            email: user.email,
            city_zone: user.city_zone,
            user_type: user.user_type.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}

// ── Handlers ──────────────────────────────────────────────────────

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful", body = ApiResponse),
        (status = 409, description = "User already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let email = req.email.trim();

    if state.store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let full_name = req.full_name.filter(|n| !n.trim().is_empty());
    let user = match state
        .store
        .create_user(UserRecord::new_consumer(email, full_name))
        .await
    {
        Ok(user) => user,
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Conflict("User already exists".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(ApiResponse::ok("Registration successful").with_data(
        serde_json::json!({ "user_id": user.id, "email": user.email }),
    )))
}

/// Log in, registering the email if it is unknown.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let email = req.email.trim();

    let user = find_or_register(&state, email).await?;

    state.store.touch_last_login(user.id, Utc::now()).await?;
    let access_token = state.identity.issue(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: TokenUser {
            id: user.id,
            phone: user.phone.unwrap_or_else(|| user.email.clone()),
            email: user.email,
            consumer_id: user.consumer_id,
            full_name: user.full_name,
            language_preference: user.language_preference,
        },
    }))
}

/// Look up a login email, registering it on first sight.
///
/// A concurrent first login for the same email may win the insert; the
/// loser then reads the winner's account.
async fn find_or_register(state: &AppState, email: &str) -> Result<UserRecord, AppError> {
    if let Some(user) = state.store.find_user_by_email(email).await? {
        return Ok(user);
    }
    match state
        .store
        .create_user(UserRecord::new_consumer(email, None))
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user registered on first login");
            Ok(user)
        }
        Err(StoreError::Duplicate(_)) => state
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::Internal("user missing after duplicate insert".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// The authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn me(State(state): State<AppState>, caller: AuthUser) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .find_user_by_id(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

/// Log out. Tokens are discarded client side.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse),
    ),
    tag = "auth"
)]
async fn logout() -> Json<ApiResponse> {
    Json(ApiResponse::ok("Logged out successfully"))
}
