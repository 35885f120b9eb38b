//! Authentication API endpoints
//!
//! Registration, login (token pair issuance), token refresh, and the
//! current-identity endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::auth::{TokenKind, TokenPair};
use crate::infrastructure::notification::SignupPayload;
use crate::infrastructure::user::RegisterUserRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

/// Registration acknowledgment
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Identity response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
        }
    }
}

/// Register a new user
///
/// POST /auth/register
///
/// Returns 201 on success. The signup webhook fires on a spawned task so the
/// response is never delayed or failed by it.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            username: request.username,
            password: request.password,
        })
        .await?;

    let notifier = state.notifier.clone();
    let payload = SignupPayload::from_user(&user);
    tokio::spawn(async move {
        notifier.notify_signup(payload).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns an access/refresh token pair. Unknown email and wrong password
/// yield the identical generic rejection.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or(DomainError::Credential)?;

    let pair = state.token_service.issue_pair(&user)?;

    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state
        .token_service
        .decode(&request.refresh, TokenKind::Refresh)?;

    let user = state
        .user_service
        .get(claims.user_id())
        .await?
        .ok_or(DomainError::Credential)?;

    let access = state.token_service.issue_access(&user)?;

    Ok(Json(RefreshResponse { access }))
}

/// Get the current authenticated identity
///
/// GET /auth/me
pub async fn me(RequireUser(user): RequireUser) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}
