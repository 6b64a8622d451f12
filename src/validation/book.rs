use garde::Validate;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::book::{BookStatus, NewBook};

/// A rating as browsers submit it: a number, a numeric string, or `""`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RatingInput {
    Number(f64),
    Text(String),
}

/// The request payload for creating or replacing a book.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub rating: Option<RatingInput>,
    pub review: Option<String>,
    pub cover_url: Option<String>,
}

#[derive(Validate)]
struct BookFields {
    #[garde(length(min = 1, max = 500))]
    title: String,
    #[garde(length(min = 1, max = 300))]
    author: String,
    #[garde(range(min = 1, max = 5))]
    rating: Option<i16>,
    #[garde(length(max = 20_000))]
    review: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_rating(rating: Option<RatingInput>) -> Result<Option<i16>> {
    let value = match rating {
        None => return Ok(None),
        Some(RatingInput::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(RatingInput::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation("Rating must be a number".to_string()))?,
        Some(RatingInput::Number(n)) => n,
    };

    if value.fract() != 0.0 || !(1.0..=5.0).contains(&value) {
        return Err(AppError::Validation(
            "Rating must be a whole number from 1 to 5".to_string(),
        ));
    }

    Ok(Some(value as i16))
}

impl BookRequest {
    /// Validates and normalizes the payload.
    ///
    /// Title, author and status are required. Review and cover are trimmed,
    /// and blank values become `None`.
    pub fn into_new_book(self) -> Result<NewBook> {
        let (Some(title), Some(author), Some(status)) = (
            non_blank(self.title),
            non_blank(self.author),
            non_blank(self.status),
        ) else {
            return Err(AppError::Validation(
                "Title, author, and status are required".to_string(),
            ));
        };

        let status: BookStatus = status.parse().map_err(AppError::Validation)?;
        let rating = parse_rating(self.rating)?;

        let fields = BookFields {
            title,
            author,
            rating,
            review: non_blank(self.review),
        };
        fields
            .validate()
            .map_err(|report| AppError::Validation(report.to_string()))?;

        Ok(NewBook {
            title: fields.title,
            author: fields.author,
            status,
            rating: fields.rating,
            review: fields.review,
            cover_url: non_blank(self.cover_url),
        })
    }
}
