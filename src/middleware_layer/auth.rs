use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{error::AppError, session::RequestContext, state::AppState};

/// A middleware that requires a valid session on API routes.
///
/// Rejects with `401` when the session cookie is missing, forged, or
/// expired, without saying which. On success the verified
/// [`SessionClaims`](crate::models::session::SessionClaims) are inserted into
/// the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let Some(claims) = state
        .sessions
        .current_identity(&RequestContext::new(&cookies))
    else {
        return AppError::Unauthorized.into_response();
    };

    tracing::debug!("✅ User authenticated: {}", claims.user_id);
    request.extensions_mut().insert(claims);

    next.run(request).await
}

/// A middleware that sends page requests without a session to the login page.
pub async fn require_page_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match state
        .sessions
        .require_identity(&RequestContext::new(&cookies))
    {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(redirect) => {
            tracing::debug!("↪️ No session, redirecting {} to {}", request.uri().path(), redirect.target);
            redirect.into_response()
        }
    }
}
