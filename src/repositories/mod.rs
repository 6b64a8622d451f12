//! Persistence seams and their PostgreSQL and in-memory implementations.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::book::{Book, NewBook, SortOrder, StatusFilter};
use crate::models::user::User;

pub mod book;
pub mod memory;
pub mod user;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// User records keyed by unique, normalized email.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Finds a user by an email that is already trimmed and lower-cased.
    async fn find_by_normalized_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Creates a user. Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User>;
}

/// The shared book collection.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    async fn list(&self, filter: StatusFilter, sort: SortOrder) -> StoreResult<Vec<Book>>;

    async fn find(&self, id: i64) -> StoreResult<Option<Book>>;

    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    /// Replaces every editable field. Returns `None` when the book does not exist.
    async fn update(&self, id: i64, book: NewBook) -> StoreResult<Option<Book>>;

    /// Returns whether a book was deleted.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
