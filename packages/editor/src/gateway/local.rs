use super::{GatewayError, GatewayResult, PersistenceGateway};
use async_trait::async_trait;
use blockpad_document::{Block, BlockBody, BlockId, Page, PageId};
use blockpad_storage::{PageStore, StoreError};
use std::sync::Arc;

/// Gateway backed by an in-process [`PageStore`].
///
/// Store failures surface with the same status codes the HTTP API would use.
#[derive(Clone)]
pub struct LocalGateway {
    store: Arc<PageStore>,
}

impl LocalGateway {
    pub fn new(store: Arc<PageStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<PageStore> {
        &self.store
    }
}

impl From<StoreError> for GatewayError {
    fn from(error: StoreError) -> Self {
        GatewayError::Rejected {
            status: error.status_code(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for LocalGateway {
    async fn list_pages(&self) -> GatewayResult<Vec<Page>> {
        Ok(self.store.list_pages()?)
    }

    async fn create_page(&self, page: &Page) -> GatewayResult<Page> {
        Ok(self.store.create_page(page.clone())?)
    }

    async fn replace_page(&self, page: &Page) -> GatewayResult<Page> {
        Ok(self.store.replace_page(&page.id, page.clone())?)
    }

    async fn delete_page(&self, id: &PageId) -> GatewayResult<()> {
        Ok(self.store.delete_page(id)?)
    }

    async fn replace_page_order(&self, pages: &[Page]) -> GatewayResult<Vec<Page>> {
        Ok(self.store.replace_page_order(pages.to_vec())?)
    }

    async fn list_blocks(&self) -> GatewayResult<Vec<Block>> {
        Ok(self.store.list_blocks()?)
    }

    async fn create_block(&self, body: &BlockBody) -> GatewayResult<Block> {
        Ok(self.store.create_block(body.clone())?)
    }

    async fn update_block(&self, id: &BlockId, body: &BlockBody) -> GatewayResult<Block> {
        Ok(self.store.update_block(id, body.clone())?)
    }

    async fn delete_block(&self, id: &BlockId) -> GatewayResult<()> {
        Ok(self.store.delete_block(id)?)
    }

    async fn reorder_blocks(&self, ids: &[BlockId]) -> GatewayResult<Vec<Block>> {
        Ok(self.store.reorder_blocks(ids)?)
    }
}
