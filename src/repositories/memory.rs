use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{BookStore, CredentialStore, StoreResult};
use crate::error::StoreError;
use crate::models::book::{Book, NewBook, SortOrder, StatusFilter};
use crate::models::user::User;

/// Users kept in process memory, for development and tests.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    // Keyed by normalized email.
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory credential store");
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_normalized_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::Conflict);
        }

        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            name: name.map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }
}

#[derive(Default)]
struct BookShelf {
    books: HashMap<i64, Book>,
    next_id: i64,
}

/// Books kept in process memory, for development and tests.
#[derive(Default)]
pub struct InMemoryBookStore {
    shelf: RwLock<BookShelf>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory book store");
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self, filter: StatusFilter, sort: SortOrder) -> StoreResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .shelf
            .read()
            .await
            .books
            .values()
            .filter(|b| filter.matches(b.status))
            .cloned()
            .collect();
        sort.sort(&mut books);
        Ok(books)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Book>> {
        Ok(self.shelf.read().await.books.get(&id).cloned())
    }

    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.next_id += 1;
        let now = Utc::now();
        let book = Book {
            id: shelf.next_id,
            title: book.title,
            author: book.author,
            status: book.status,
            rating: book.rating,
            review: book.review,
            cover_url: book.cover_url,
            created_at: now,
            updated_at: now,
        };
        shelf.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, book: NewBook) -> StoreResult<Option<Book>> {
        let mut shelf = self.shelf.write().await;
        let Some(existing) = shelf.books.get_mut(&id) else {
            return Ok(None);
        };

        existing.title = book.title;
        existing.author = book.author;
        existing.status = book.status;
        existing.rating = book.rating;
        existing.review = book.review;
        existing.cover_url = book.cover_url;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.shelf.write().await.books.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookStatus;

    fn new_book(title: &str, status: BookStatus, rating: Option<i16>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            status,
            rating,
            review: None,
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryCredentialStore::new();
        let first = store.create_user("a@x.com", None, "hash").await.unwrap();
        assert_eq!(first.id, 1);

        let second = store.create_user("a@x.com", Some("Other"), "hash2").await;
        assert!(matches!(second, Err(StoreError::Conflict)));
    }

    #[tokio::test]
    async fn created_user_is_found_immediately() {
        let store = InMemoryCredentialStore::new();
        store.create_user("a@x.com", Some("A"), "hash").await.unwrap();

        let found = store.find_by_normalized_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("A"));
        assert_eq!(found.password_hash, "hash");
        assert!(store.find_by_normalized_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn book_crud() {
        let store = InMemoryBookStore::new();
        let created = store
            .create(new_book("Dune", BookStatus::ToRead, None))
            .await
            .unwrap();
        assert_eq!(store.find(created.id).await.unwrap(), Some(created.clone()));

        let updated = store
            .update(created.id, new_book("Dune Messiah", BookStatus::Reading, Some(4)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert_eq!(store.find(created.id).await.unwrap(), None);
        assert_eq!(
            store
                .update(created.id, new_book("Gone", BookStatus::ToRead, None))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let store = InMemoryBookStore::new();
        store.create(new_book("a", BookStatus::Completed, Some(2))).await.unwrap();
        store.create(new_book("b", BookStatus::Reading, None)).await.unwrap();
        store.create(new_book("c", BookStatus::Completed, Some(5))).await.unwrap();

        let completed = store
            .list(StatusFilter::Only(BookStatus::Completed), SortOrder::RatingDesc)
            .await
            .unwrap();
        let titles: Vec<_> = completed.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a"]);

        let all = store.list(StatusFilter::All, SortOrder::Newest).await.unwrap();
        let titles: Vec<_> = all.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }
}
