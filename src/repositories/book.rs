use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use super::{BookStore, StoreResult};
use crate::{
    error::StoreError,
    models::book::{Book, BookStatus, NewBook, SortOrder, StatusFilter},
};

const BOOK_COLUMNS: &str =
    "id, title, author, status, rating, review, cover_url, created_at, updated_at";

fn column<'a, T>(row: &'a Row, name: &str) -> StoreResult<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|_| StoreError::MissingData(name.to_string()))
}

/// A helper function to map a `tokio_postgres::Row` to a `Book`.
fn row_to_book(row: &Row) -> StoreResult<Book> {
    let status: String = column(row, "status")?;
    Ok(Book {
        id: column(row, "id")?,
        title: column(row, "title")?,
        author: column(row, "author")?,
        status: status
            .parse::<BookStatus>()
            .map_err(StoreError::MissingData)?,
        rating: column(row, "rating")?,
        review: column(row, "review")?,
        cover_url: column(row, "cover_url")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

/// Books stored in the `books` table.
#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool,
}

impl PgBookStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list(&self, filter: StatusFilter, sort: SortOrder) -> StoreResult<Vec<Book>> {
        let client = self.pool.get().await?;
        let order_by = sort.order_by_clause();

        let rows = match filter {
            StatusFilter::All => {
                let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY {order_by}");
                client.query(sql.as_str(), &[]).await?
            }
            StatusFilter::Only(status) => {
                let sql = format!(
                    "SELECT {BOOK_COLUMNS} FROM books WHERE status = $1 ORDER BY {order_by}"
                );
                client.query(sql.as_str(), &[&status.as_str()]).await?
            }
        };

        rows.iter().map(row_to_book).collect()
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Book>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        row.map(|r| row_to_book(&r)).transpose()
    }

    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            INSERT INTO books (title, author, status, rating, review, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOOK_COLUMNS}
            "#
        );
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &book.title,
                    &book.author,
                    &book.status.as_str(),
                    &book.rating,
                    &book.review,
                    &book.cover_url,
                ],
            )
            .await?;
        row_to_book(&row)
    }

    async fn update(&self, id: i64, book: NewBook) -> StoreResult<Option<Book>> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, status = $4, rating = $5, review = $6,
                cover_url = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOK_COLUMNS}
            "#
        );
        let row = client
            .query_opt(
                sql.as_str(),
                &[
                    &id,
                    &book.title,
                    &book.author,
                    &book.status.as_str(),
                    &book.rating,
                    &book.review,
                    &book.cover_url,
                ],
            )
            .await?;
        row.map(|r| row_to_book(&r)).transpose()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM books WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
