use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Serves a static page from the public directory.
///
/// Mounted behind the page gate for everything under `/books`.
pub async fn serve_page(State(state): State<AppState>, request: Request) -> Response {
    match ServeDir::new(&state.config.public_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
