//! Error types for the page store

use blockpad_document::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("Id in path ({path}) does not match id in body ({body})")]
    IdMismatch { path: String, body: String },

    #[error("Invalid reorder: {0}")]
    InvalidPermutation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn page_not_found(id: impl ToString) -> Self {
        StoreError::NotFound {
            kind: "Page",
            id: id.to_string(),
        }
    }

    pub(crate) fn block_not_found(id: impl ToString) -> Self {
        StoreError::NotFound {
            kind: "Block",
            id: id.to_string(),
        }
    }

    /// HTTP-style status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Validation(_)
            | StoreError::IdMismatch { .. }
            | StoreError::InvalidPermutation(_) => 400,
            StoreError::NotFound { .. } => 404,
            StoreError::Conflict { .. } => 409,
            StoreError::Io(_) | StoreError::Json(_) => 500,
        }
    }
}
