use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised at the persistence boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated")]
    Conflict,

    /// The connection pool could not hand out a client.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A row was missing an expected column.
    #[error("Missing column: {0}")]
    MissingData(String),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown email or wrong password. Both produce the same signal.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration with an email that already has an account.
    #[error("An account already exists.")]
    DuplicateEmail,

    /// No valid session on a protected API route.
    #[error("Unauthorized")]
    Unauthorized,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persistence error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidCredentials => {
                tracing::warn!("Login rejected: invalid credentials");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::DuplicateEmail => {
                tracing::warn!("Registration rejected: email already registered");
                (StatusCode::CONFLICT, self.to_string())
            }

            AppError::Unauthorized => {
                tracing::warn!("Request without a valid session");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Store(StoreError::Conflict) => {
                tracing::warn!("Store conflict");
                (StatusCode::CONFLICT, "Conflict".to_string())
            }

            AppError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
