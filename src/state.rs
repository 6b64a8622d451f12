use std::sync::Arc;

use crate::config::Config;
use crate::crypto::{password::PasswordHasher, token::TokenCodec};
use crate::repositories::{
    book::PgBookStore,
    memory::{InMemoryBookStore, InMemoryCredentialStore},
    user::PgCredentialStore,
    BookStore, CredentialStore,
};
use crate::session::SessionAccessor;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// User records.
    pub users: Arc<dyn CredentialStore>,
    /// The book collection.
    pub books: Arc<dyn BookStore>,
    /// Password hashing.
    pub hasher: PasswordHasher,
    /// Session cookie reading and writing.
    pub sessions: SessionAccessor,
}

impl AppState {
    /// Creates a new `AppState`, backed by PostgreSQL when `DATABASE_URL` is set.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let Some(database_url) = config.database_url.as_deref() else {
            tracing::warn!("⚠️ DATABASE_URL not set, using in-memory stores (data is lost on restart)");
            return Ok(Self::in_memory(config));
        };

        let pool = crate::db::create_pool(database_url)?;
        crate::db::run_migrations(&pool).await?;
        tracing::info!("✅ PostgreSQL pool initialized");

        Ok(Self::with_stores(
            config,
            Arc::new(PgCredentialStore::new(pool.clone())),
            Arc::new(PgBookStore::new(pool)),
        ))
    }

    /// Creates an `AppState` over fresh in-memory stores.
    pub fn in_memory(config: &Config) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryBookStore::new()),
        )
    }

    pub fn with_stores(
        config: &Config,
        users: Arc<dyn CredentialStore>,
        books: Arc<dyn BookStore>,
    ) -> Self {
        let codec = TokenCodec::new(&config.auth_secret);

        Self {
            config: config.clone(),
            users,
            books,
            hasher: PasswordHasher::new(),
            sessions: SessionAccessor::new(codec, config.secure_cookies),
        }
    }
}
