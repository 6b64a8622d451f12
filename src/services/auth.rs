use crate::crypto::password::PasswordHasher;
use crate::error::{AppError, Result, StoreError};
use crate::models::user::User;
use crate::state::AppState;
use crate::validation::auth::{validate_email, validate_password, Credentials};

async fn hash_password(hasher: &PasswordHasher, password: &str) -> Result<String> {
    let hasher = hasher.clone();
    let password = zeroize::Zeroizing::new(password.to_string());
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

async fn verify_password(hasher: &PasswordHasher, password: &str, hash: &str) -> Result<bool> {
    let hasher = hasher.clone();
    let password = zeroize::Zeroizing::new(password.to_string());
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))
}

/// Creates a new user.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `credentials` - Normalized email and password.
/// * `name` - The normalized display name.
///
/// # Returns
///
/// A `Result` containing the created `User`, or `DuplicateEmail` when the
/// email already has an account.
pub async fn register(
    state: &AppState,
    credentials: Credentials,
    name: Option<String>,
) -> Result<User> {
    validate_email(&credentials.email)?;
    validate_password(&credentials.password)?;

    tracing::debug!("🔐 Creating user: {}", credentials.email);

    if state
        .users
        .find_by_normalized_email(&credentials.email)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&state.hasher, &credentials.password).await?;

    // A concurrent registration can still win the race; the unique index decides.
    let user = state
        .users
        .create_user(&credentials.email, name.as_deref(), &password_hash)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => AppError::DuplicateEmail,
            other => AppError::Store(other),
        })?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user.
///
/// Unknown email and wrong password fail identically with `InvalidCredentials`.
pub async fn authenticate(state: &AppState, credentials: Credentials) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", credentials.email);

    let user = state
        .users
        .find_by_normalized_email(&credentials.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&state.hasher, &credentials.password, &user.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}
