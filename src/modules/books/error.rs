use serde::Serialize;
use serde_json::json;
use shelf_db::DbError;
use shelf_http::error::{AppError, HtmlError};
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum BookError {
    /// Input rejected before any statement ran
    #[error("invalid book: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("Book with id: {0} not found.")]
    NotFound(i64),

    /// Storage rejected a mutating statement; carries the storage error text
    #[error("{0}")]
    Conflict(String),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error(transparent)]
    Storage(#[from] DbError),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl BookError {
    pub fn conflict(err: rusqlite::Error) -> Self {
        Self::Conflict(err.to_string())
    }

    /// Update reports storage rejections as 400 rather than 409.
    pub fn into_update_error(self) -> AppError {
        match self {
            BookError::Conflict(message) => AppError::bad_request(message),
            other => other.into(),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Validation(ref errors) => {
                let details = errors
                    .iter()
                    .map(|e| json!({ "field": e.field, "error": e.message }))
                    .collect();
                AppError::validation(details, err.to_string())
            }
            // Kept at 400 for compatibility with existing clients.
            BookError::NotFound(_) => AppError::bad_request(err.to_string()),
            BookError::Conflict(message) => AppError::conflict(vec![], message),
            BookError::Query(_) | BookError::Storage(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<BookError> for HtmlError {
    fn from(err: BookError) -> Self {
        HtmlError(err.into())
    }
}
