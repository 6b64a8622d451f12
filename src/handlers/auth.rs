use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::json_response;
use crate::{
    error::Result,
    models::{session::SessionClaims, user::UserProfile},
    services::auth as auth_service,
    session::RequestContext,
    state::AppState,
    validation::auth::{normalize_name, require_credentials},
};

/// The request payload for user registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let credentials =
        require_credentials(payload.email.as_deref(), payload.password.as_deref())?;
    let name = normalize_name(payload.name.as_deref())?;
    tracing::info!("📝 Register attempt: {}", credentials.email);

    let user = auth_service::register(&state, credentials, name).await?;

    let identity = user.identity();
    state
        .sessions
        .start_session(&RequestContext::new(&cookies), &identity)?;
    tracing::info!("✅ User registered: {}", user.id);

    json_response(StatusCode::CREATED, &UserProfile::from(identity))
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let credentials =
        require_credentials(payload.email.as_deref(), payload.password.as_deref())?;
    tracing::info!("🔐 Login attempt: {}", credentials.email);

    let user = auth_service::authenticate(&state, credentials).await?;

    let identity = user.identity();
    state
        .sessions
        .start_session(&RequestContext::new(&cookies), &identity)?;
    tracing::info!("✅ User logged in: {}", user.id);

    json_response(StatusCode::OK, &UserProfile::from(identity))
}

/// Handles user logout. Works with or without a session.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    state.sessions.end_session(&RequestContext::new(&cookies));
    tracing::info!("👋 Session cookie cleared");

    json_response(StatusCode::OK, &sonic_rs::json!({ "success": true }))
}

/// Returns the identity of the current session.
#[axum::debug_handler]
pub async fn me(Extension(claims): Extension<SessionClaims>) -> Result<Response> {
    json_response(StatusCode::OK, &UserProfile::from(claims.identity()))
}
