//! # Persistence Gateway
//!
//! The editor's view of the backend: fetch the current document state and
//! replace it, one resource at a time. Each call carries the entire new state
//! of its resource, never a delta.
//!
//! - [`HttpGateway`]: talks to `blockpad-server` over HTTP + JSON
//! - [`LocalGateway`]: calls a [`PageStore`](blockpad_storage::PageStore) in-process

mod http;
mod local;

pub use http::HttpGateway;
pub use local::LocalGateway;

use async_trait::async_trait;
use blockpad_document::{Block, BlockBody, BlockId, Page, PageId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The backend answered with a failure status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("failed to parse response")]
    Parse,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status() == Some(400)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn list_pages(&self) -> GatewayResult<Vec<Page>>;

    /// Create a page under the id it already carries.
    async fn create_page(&self, page: &Page) -> GatewayResult<Page>;

    /// Replace one page (title and full block list).
    async fn replace_page(&self, page: &Page) -> GatewayResult<Page>;

    async fn delete_page(&self, id: &PageId) -> GatewayResult<()>;

    /// Persist the sidebar order; the ids must be a permutation of the stored ones.
    async fn replace_page_order(&self, pages: &[Page]) -> GatewayResult<Vec<Page>>;

    async fn list_blocks(&self) -> GatewayResult<Vec<Block>>;

    async fn create_block(&self, body: &BlockBody) -> GatewayResult<Block>;

    async fn update_block(&self, id: &BlockId, body: &BlockBody) -> GatewayResult<Block>;

    async fn delete_block(&self, id: &BlockId) -> GatewayResult<()>;

    async fn reorder_blocks(&self, ids: &[BlockId]) -> GatewayResult<Vec<Block>>;
}
