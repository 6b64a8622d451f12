use chrono::{DateTime, Utc};
use serde::Serialize;

use super::session::Identity;

/// Represents a user in the system.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The user's email address, trimmed and lower-cased.
    pub email: String,
    /// The user's display name.
    pub name: Option<String>,
    /// The user's hashed password.
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The fields a session token is issued for.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// The public view of a user returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
}

impl From<Identity> for UserProfile {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            email: identity.email,
            name: identity.name,
        }
    }
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn profile_hides_password_hash() {
        let user = User {
            id: 3,
            email: "a@x.com".to_string(),
            name: Some("A".to_string()),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let profile = UserProfile::from(user.identity());
        assert_eq!(
            profile,
            UserProfile {
                id: 3,
                email: "a@x.com".to_string(),
                name: Some("A".to_string()),
            }
        );
    }
}
