use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::{error::SqlState, Row};

use super::{CredentialStore, StoreResult};
use crate::{error::StoreError, models::user::User};

const USER_COLUMNS: &str = "id, email, name, password_hash, created_at";

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| StoreError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| StoreError::MissingData("email".to_string()))?,
        name: row.try_get("name").map_err(|_| StoreError::MissingData("name".to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|_| StoreError::MissingData("password_hash".to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|_| StoreError::MissingData("created_at".to_string()))?,
    })
}

/// Maps a unique-constraint violation to [`StoreError::Conflict`].
pub(crate) fn map_write_error(e: tokio_postgres::Error) -> StoreError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::Conflict
    } else {
        StoreError::Database(e)
    }
}

/// Users stored in the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: Pool,
}

impl PgCredentialStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_normalized_email(&self, email: &str) -> StoreResult<Option<User>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = client.query_opt(sql.as_str(), &[&email]).await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let row = client
            .query_one(sql.as_str(), &[&email, &name, &password_hash])
            .await
            .map_err(map_write_error)?;
        row_to_user(&row)
    }
}
