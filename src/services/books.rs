use crate::{
    error::{AppError, Result},
    models::book::{shelf_rows, Book, NewBook, SortOrder, StatusFilter},
    state::AppState,
};

/// Parses a book id from a path segment.
pub fn parse_book_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid id".to_string()))
}

/// Lists books matching `filter` in `sort` order.
pub async fn list_books(
    state: &AppState,
    filter: StatusFilter,
    sort: SortOrder,
) -> Result<Vec<Book>> {
    Ok(state.books.list(filter, sort).await?)
}

/// Lists books and splits them into shelf rows.
pub async fn shelf(
    state: &AppState,
    filter: StatusFilter,
    sort: SortOrder,
) -> Result<Vec<Vec<Book>>> {
    let books = list_books(state, filter, sort).await?;
    Ok(shelf_rows(books))
}

/// Gets a book.
///
/// # Returns
///
/// The book, or `NotFound`.
pub async fn get_book(state: &AppState, id: i64) -> Result<Book> {
    state.books.find(id).await?.ok_or(AppError::NotFound)
}

/// Creates a book.
pub async fn create_book(state: &AppState, book: NewBook) -> Result<Book> {
    let book = state.books.create(book).await?;
    tracing::info!("📚 Book created: {}", book.id);
    Ok(book)
}

/// Replaces the editable fields of a book.
pub async fn update_book(state: &AppState, id: i64, book: NewBook) -> Result<Book> {
    let book = state
        .books
        .update(id, book)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!("📚 Book updated: {}", book.id);
    Ok(book)
}

/// Deletes a book.
pub async fn delete_book(state: &AppState, id: i64) -> Result<()> {
    if !state.books.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("🗑️ Book deleted: {}", id);
    Ok(())
}
