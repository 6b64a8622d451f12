use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Books per shelf row.
pub const SHELF_SIZE: usize = 4;

/// Where a book is in the reading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    ToRead,
    Reading,
    Completed,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::ToRead, BookStatus::Reading, BookStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::ToRead => "TO_READ",
            BookStatus::Reading => "READING",
            BookStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// A book on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    /// 1 to 5 stars.
    pub rating: Option<i16>,
    pub review: Option<String>,
    /// Opaque cover reference, usually an inline data URL.
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized fields for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub rating: Option<i16>,
    pub review: Option<String>,
    pub cover_url: Option<String>,
}

/// Which statuses a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(BookStatus),
}

impl StatusFilter {
    /// Parses a query value case-insensitively; anything unknown means `All`.
    pub fn normalize(input: Option<&str>) -> Self {
        input
            .and_then(|s| s.trim().to_uppercase().parse::<BookStatus>().ok())
            .map_or(StatusFilter::All, StatusFilter::Only)
    }

    pub fn matches(&self, status: BookStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// The order of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    RatingDesc,
    RatingAsc,
}

impl SortOrder {
    /// Parses a query value; anything unknown means `Newest`.
    pub fn normalize(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            Some("rating-desc") => SortOrder::RatingDesc,
            Some("rating-asc") => SortOrder::RatingAsc,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::RatingDesc => "rating-desc",
            SortOrder::RatingAsc => "rating-asc",
        }
    }

    /// Sorts `books` in place. Unrated books go last in both rating orders,
    /// and ties fall back to newest first.
    pub fn sort(&self, books: &mut [Book]) {
        let newest = |a: &Book, b: &Book| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        };

        match self {
            SortOrder::Newest => books.sort_by(newest),
            SortOrder::RatingDesc => books.sort_by(|a, b| match (a.rating, b.rating) {
                (Some(x), Some(y)) => y.cmp(&x).then_with(|| newest(a, b)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => newest(a, b),
            }),
            SortOrder::RatingAsc => books.sort_by(|a, b| match (a.rating, b.rating) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| newest(a, b)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => newest(a, b),
            }),
        }
    }

    /// The SQL `ORDER BY` clause matching [`sort`](Self::sort).
    pub fn order_by_clause(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at DESC, id DESC",
            SortOrder::RatingDesc => "rating DESC NULLS LAST, created_at DESC, id DESC",
            SortOrder::RatingAsc => "rating ASC NULLS LAST, created_at DESC, id DESC",
        }
    }
}

/// Splits a listing into shelf rows of [`SHELF_SIZE`] books.
pub fn shelf_rows(books: Vec<Book>) -> Vec<Vec<Book>> {
    books.chunks(SHELF_SIZE).map(<[Book]>::to_vec).collect()
}
