use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use super::json_response;
use crate::{
    error::Result,
    models::book::{Book, SortOrder, StatusFilter},
    services::books as book_service,
    state::AppState,
    validation::book::BookRequest,
};

/// The query parameters for listing books.
#[derive(Deserialize, Default)]
pub struct ListBooksQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
}

impl ListBooksQuery {
    fn normalize(&self) -> (StatusFilter, SortOrder) {
        (
            StatusFilter::normalize(self.status.as_deref()),
            SortOrder::normalize(self.sort.as_deref()),
        )
    }
}

#[derive(Serialize)]
struct ShelfResponse {
    status: &'static str,
    sort: &'static str,
    count: usize,
    rows: Vec<Vec<Book>>,
}

/// Lists books.
#[axum::debug_handler]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Response> {
    let (filter, sort) = query.normalize();
    let books = book_service::list_books(&state, filter, sort).await?;
    json_response(StatusCode::OK, &books)
}

/// Lists books arranged in shelf rows.
#[axum::debug_handler]
pub async fn shelf(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Response> {
    let (filter, sort) = query.normalize();
    let rows = book_service::shelf(&state, filter, sort).await?;

    let response = ShelfResponse {
        status: filter.as_str(),
        sort: sort.as_str(),
        count: rows.iter().map(Vec::len).sum(),
        rows,
    };
    json_response(StatusCode::OK, &response)
}

/// Creates a new book.
#[axum::debug_handler]
pub async fn create_book(
    State(state): State<AppState>,
    req: std::result::Result<Json<BookRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = req?;
    let book = book_service::create_book(&state, req.into_new_book()?).await?;
    json_response(StatusCode::CREATED, &book)
}

/// Gets a book.
#[axum::debug_handler]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = book_service::parse_book_id(&id)?;
    let book = book_service::get_book(&state, id).await?;
    json_response(StatusCode::OK, &book)
}

/// Replaces a book.
#[axum::debug_handler]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: std::result::Result<Json<BookRequest>, JsonRejection>,
) -> Result<Response> {
    let id = book_service::parse_book_id(&id)?;
    let Json(req) = req?;
    let book = book_service::update_book(&state, id, req.into_new_book()?).await?;
    json_response(StatusCode::OK, &book)
}

/// Deletes a book.
#[axum::debug_handler]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = book_service::parse_book_id(&id)?;
    book_service::delete_book(&state, id).await?;
    json_response(StatusCode::OK, &sonic_rs::json!({ "success": true }))
}
