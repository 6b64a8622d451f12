use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use http::{header, Method};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, session::LOGIN_PATH, state::AppState};

/// Builds the application router.
///
/// Register and login are rate-limited per peer IP when configured, which
/// requires serving with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build(state: AppState) -> Router {
    let config = state.config.clone();

    let mut credential_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    if let Some(limit) = config.auth_rate_limit {
        match GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .use_headers()
            .finish()
        {
            Some(governor_conf) => {
                credential_routes = credential_routes
                    .layer(tower_governor::GovernorLayer::new(Arc::new(governor_conf)));
            }
            None => tracing::warn!("⚠️ Invalid auth rate limit {:?}, limiter disabled", limit),
        }
    }

    let public_routes = Router::new()
        .merge(credential_routes)
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route_service(
            LOGIN_PATH,
            ServeFile::new(config.public_dir.join("login.html")),
        );

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/books",
            get(handlers::books::list_books).post(handlers::books::create_book),
        )
        .route("/api/books/shelf", get(handlers::books::shelf))
        .route(
            "/api/books/{id}",
            get(handlers::books::get_book)
                .put(handlers::books::update_book)
                .delete(handlers::books::delete_book),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ));

    let page_routes = Router::new()
        .route("/books", get(handlers::pages::serve_page))
        .route("/books/", get(handlers::pages::serve_page))
        .route("/books/{*path}", get(handlers::pages::serve_page))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_page_session,
        ));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(page_routes)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .with_state(state)
}
