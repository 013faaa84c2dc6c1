//! Error types for the editor

use crate::gateway::GatewayError;
use crate::probe::ProbeError;
use blockpad_document::{PageId, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Could not read image: {0}")]
    Probe(#[from] ProbeError),

    #[error("Page load cancelled")]
    Cancelled,
}

impl EditorError {
    /// Failure caused by a reference that no longer exists locally.
    pub fn is_stale(&self) -> bool {
        matches!(self, EditorError::PageNotFound(_))
    }
}
