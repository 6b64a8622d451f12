use serde::{Deserialize, Serialize};

/// The identity fields a session vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub name: Option<String>,
}

/// The claim carried inside a signed session token.
///
/// Exists only inside the token and the cookie holding it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// The ID of the user this session belongs to.
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
