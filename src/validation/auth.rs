use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::user::normalize_email;

/// Longest accepted password, in bytes.
const MAX_PASSWORD_BYTES: usize = 1024;
/// Longest accepted display name, in characters.
const MAX_NAME_CHARS: usize = 100;

#[derive(Validate)]
struct EmailAddress(#[garde(email)] String);

/// Email and password as submitted to register or login, after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Normalizes the email and checks both fields are present.
///
/// # Arguments
///
/// * `email` - The submitted email, if any.
/// * `password` - The submitted password, if any.
///
/// # Returns
///
/// A `Result` containing the normalized `Credentials`.
pub fn require_credentials(email: Option<&str>, password: Option<&str>) -> Result<Credentials> {
    let email = email.map(normalize_email).unwrap_or_default();
    let password = password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    Ok(Credentials {
        email,
        password: password.to_string(),
    })
}

/// Validates the format of an already normalized email.
pub fn validate_email(email: &str) -> Result<()> {
    EmailAddress(email.to_string())
        .validate()
        .map_err(|_| AppError::Validation("Invalid email address".to_string()))
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    Ok(())
}

/// Trims a display name; blank names become `None`.
pub fn normalize_name(name: Option<&str>) -> Result<Option<String>> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());

    if let Some(n) = name {
        if n.chars().count() > MAX_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_CHARS
            )));
        }
    }

    Ok(name.map(str::to_string))
}
