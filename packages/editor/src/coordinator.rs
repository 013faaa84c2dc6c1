//! # Optimistic Mutation Coordinator
//!
//! Every state-changing action runs the same transaction:
//!
//! ```text
//!  snapshot ──► apply locally ──► publish ──► persist (one call)
//!                                                 │
//!                              ok ◄───────────────┤
//!                                                 ▼ err
//!                                    restore snapshot, set banner,
//!                                    return the error to the caller
//! ```
//!
//! State lives in a [`watch`] channel. Subscribers see every optimistic and
//! every rolled-back state. Local updates happen synchronously in dispatch
//! order and the channel lock is never held across the network call.
//!
//! Rollbacks restore the pre-image of their own transaction. When two
//! transactions overlap and the earlier one fails last, its rollback also
//! discards the later one's optimistic change.

use crate::gateway::{GatewayResult, PersistenceGateway};
use crate::state::DocumentState;
use crate::EditorError;
use blockpad_document::{
    insert_after, remove, reorder_by_dragged_target, reorder_pages, update_block, Block,
    BlockBody, BlockId, DropSide, Page, PageId,
};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Result of a title commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Trimmed title equals the current one, nothing was sent.
    Unchanged,
    /// Title was empty after trimming, the edit was dropped.
    Discarded,
}

/// Which parts of the state a rollback puts back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Pages,
    PagesAndSelection,
}

struct Snapshot {
    pages: Vec<Page>,
    active_page: Option<PageId>,
    scope: Scope,
}

enum Applied {
    Missing,
    Unchanged(Page),
    Changed(Page),
}

pub struct Coordinator<G> {
    gateway: Arc<G>,
    state: Arc<watch::Sender<DocumentState>>,
}

impl<G> Clone for Coordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: PersistenceGateway> Coordinator<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_shared_gateway(Arc::new(gateway))
    }

    pub fn with_shared_gateway(gateway: Arc<G>) -> Self {
        let (state, _) = watch::channel(DocumentState::default());
        Self {
            gateway,
            state: Arc::new(state),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Receive every state the coordinator publishes.
    pub fn subscribe(&self) -> watch::Receiver<DocumentState> {
        self.state.subscribe()
    }

    /// Copy of the current (possibly unconfirmed) state.
    pub fn current(&self) -> DocumentState {
        self.state.borrow().clone()
    }

    // ------------------------------------------------------------------
    // Loading and selection
    // ------------------------------------------------------------------

    /// Fetch the page list and replace local state with it.
    ///
    /// A load cancelled before the response arrives leaves state untouched.
    pub async fn load_pages(&self, cancel: &CancellationToken) -> Result<(), EditorError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Page load cancelled");
                return Err(EditorError::Cancelled);
            }
            result = self.gateway.list_pages() => result,
        };

        match result {
            Ok(pages) => {
                tracing::debug!(pages = pages.len(), "Pages loaded");
                self.state.send_modify(|state| {
                    state.pages = pages;
                    state.error = None;
                    state.settle_selection();
                });
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to load pages");
                let message = error.to_string();
                self.state.send_modify(|state| state.error = Some(message));
                Err(error.into())
            }
        }
    }

    /// Open a page. Returns `false` when the id is unknown.
    pub fn select_page(&self, id: &PageId) -> bool {
        self.state.send_if_modified(|state| {
            if state.page(id).is_none() || state.active_page.as_ref() == Some(id) {
                return false;
            }
            state.active_page = Some(id.clone());
            true
        });
        self.state.borrow().active_page.as_ref() == Some(id)
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Append a new page and select it before the create call resolves.
    pub async fn create_page(&self, title: &str) -> Result<Page, EditorError> {
        let page = Page::new(title)?;

        let snapshot = self.snapshot(Scope::PagesAndSelection);
        self.state.send_modify(|state| {
            state.pages.push(page.clone());
            state.active_page = Some(page.id.clone());
        });

        let result = self.gateway.create_page(&page).await;
        self.settle("create_page", snapshot, result)?;
        Ok(page)
    }

    pub async fn rename_page(&self, id: &PageId, title: &str) -> Result<RenameOutcome, EditorError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(RenameOutcome::Discarded);
        }

        let current = self.require_page(id)?;
        if current.title == title {
            return Ok(RenameOutcome::Unchanged);
        }

        let renamed = current.with_title(title);
        let snapshot = self.snapshot(Scope::Pages);
        self.replace_local(&renamed);

        let result = self.gateway.replace_page(&renamed).await;
        self.settle("rename_page", snapshot, result)?;
        Ok(RenameOutcome::Renamed)
    }

    /// Remove a page. Deleting the open page selects the first remaining one.
    pub async fn delete_page(&self, id: &PageId) -> Result<(), EditorError> {
        self.require_page(id)?;

        let snapshot = self.snapshot(Scope::PagesAndSelection);
        self.state.send_modify(|state| {
            state.pages = remove(&state.pages, id);
            state.settle_selection();
        });

        let result = self.gateway.delete_page(id).await;
        self.settle("delete_page", snapshot, result)
    }

    /// Replace the sidebar order with a caller-supplied permutation.
    pub async fn reorder_pages(&self, ordered: Vec<Page>) -> Result<(), EditorError> {
        let snapshot = self.snapshot(Scope::Pages);
        self.state.send_modify(|state| {
            state.pages = reorder_pages(&state.pages, &ordered);
        });

        let result = self.gateway.replace_page_order(&ordered).await;
        self.settle("reorder_pages", snapshot, result).map(|_| ())
    }

    /// Drag-and-drop for the sidebar. Drops that change nothing send nothing.
    pub async fn move_page(
        &self,
        dragged: &PageId,
        target: &PageId,
        side: DropSide,
    ) -> Result<(), EditorError> {
        let pages = self.state.borrow().pages.clone();
        let ordered = reorder_by_dragged_target(&pages, dragged, target, side);
        if ordered == pages {
            return Ok(());
        }
        self.reorder_pages(ordered).await
    }

    // ------------------------------------------------------------------
    // Blocks (page-scoped, persisted as one page replace)
    // ------------------------------------------------------------------

    /// Insert a block after `anchor`, or at the end of the page.
    pub async fn insert_block(
        &self,
        page_id: &PageId,
        anchor: Option<&BlockId>,
        body: BlockBody,
    ) -> Result<BlockId, EditorError> {
        body.validate()?;
        let block = Block::new(body);
        let id = block.id.clone();

        self.mutate_blocks("insert_block", page_id, |blocks| {
            insert_after(blocks, anchor, block)
        })
        .await?;
        Ok(id)
    }

    /// Replace a block's type, content and styles as a whole.
    pub async fn update_block(
        &self,
        page_id: &PageId,
        block_id: &BlockId,
        body: BlockBody,
    ) -> Result<(), EditorError> {
        body.validate()?;
        self.mutate_blocks("update_block", page_id, |blocks| {
            update_block(blocks, block_id, body)
        })
        .await
    }

    pub async fn delete_block(&self, page_id: &PageId, block_id: &BlockId) -> Result<(), EditorError> {
        self.mutate_blocks("delete_block", page_id, |blocks| remove(blocks, block_id))
            .await
    }

    pub async fn move_block(
        &self,
        page_id: &PageId,
        dragged: &BlockId,
        target: &BlockId,
        side: DropSide,
    ) -> Result<(), EditorError> {
        self.mutate_blocks("move_block", page_id, |blocks| {
            reorder_by_dragged_target(blocks, dragged, target, side)
        })
        .await
    }

    // ------------------------------------------------------------------
    // Transaction plumbing
    // ------------------------------------------------------------------

    fn snapshot(&self, scope: Scope) -> Snapshot {
        let state = self.state.borrow();
        Snapshot {
            pages: state.pages.clone(),
            active_page: state.active_page.clone(),
            scope,
        }
    }

    fn require_page(&self, id: &PageId) -> Result<Page, EditorError> {
        self.state
            .borrow()
            .page(id)
            .cloned()
            .ok_or_else(|| EditorError::PageNotFound(id.clone()))
    }

    fn replace_local(&self, page: &Page) {
        self.state.send_modify(|state| {
            if let Some(slot) = state.page_mut(&page.id) {
                *slot = page.clone();
            }
        });
    }

    async fn mutate_blocks<F>(&self, label: &'static str, page_id: &PageId, transform: F) -> Result<(), EditorError>
    where
        F: FnOnce(&[Block]) -> Vec<Block>,
    {
        let snapshot = self.snapshot(Scope::Pages);

        let mut applied = Applied::Missing;
        self.state.send_if_modified(|state| {
            let Some(page) = state.page_mut(page_id) else {
                return false;
            };
            let blocks = transform(&page.blocks);
            if blocks == page.blocks {
                applied = Applied::Unchanged(page.clone());
                return false;
            }
            page.blocks = blocks;
            applied = Applied::Changed(page.clone());
            true
        });

        let updated = match applied {
            Applied::Missing => return Err(EditorError::PageNotFound(page_id.clone())),
            Applied::Unchanged(page) => {
                tracing::trace!(mutation = label, page_id = %page.id, "Nothing to persist");
                return Ok(());
            }
            Applied::Changed(page) => page,
        };

        let result = self.gateway.replace_page(&updated).await;
        self.settle(label, snapshot, result).map(|_| ())
    }

    fn settle<T>(&self, label: &'static str, snapshot: Snapshot, result: GatewayResult<T>) -> Result<T, EditorError> {
        match result {
            Ok(value) => {
                tracing::debug!(mutation = label, "Mutation confirmed");
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(mutation = label, error = %error, "Mutation failed, rolling back");
                let message = error.to_string();
                self.state.send_modify(|state| {
                    state.pages = snapshot.pages;
                    if snapshot.scope == Scope::PagesAndSelection {
                        state.active_page = snapshot.active_page;
                    }
                    state.error = Some(message);
                });
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LocalGateway;
    use blockpad_document::TextVariant;
    use blockpad_storage::PageStore;

    fn coordinator() -> Coordinator<LocalGateway> {
        Coordinator::new(LocalGateway::new(Arc::new(PageStore::in_memory())))
    }

    #[tokio::test]
    async fn test_create_then_insert_persists_whole_page() {
        let coordinator = coordinator();
        let page = coordinator.create_page("  Notes ").await.unwrap();
        assert_eq!(page.title, "Notes");
        assert_eq!(coordinator.current().active_page, Some(page.id.clone()));

        let first = coordinator
            .insert_block(&page.id, None, BlockBody::text("one", TextVariant::Paragraph))
            .await
            .unwrap();
        coordinator
            .insert_block(&page.id, Some(&first), BlockBody::text("two", TextVariant::H2))
            .await
            .unwrap();

        let stored = coordinator.gateway().store().list_pages().unwrap();
        assert_eq!(stored[0].blocks.len(), 2);
        assert_eq!(stored[0].blocks[0].id, first);
        assert_eq!(coordinator.current().pages, stored);
    }

    #[tokio::test]
    async fn test_invalid_body_rejected_before_apply() {
        let coordinator = coordinator();
        let page = coordinator.create_page("Notes").await.unwrap();
        let before = coordinator.current();

        let error = coordinator
            .insert_block(&page.id, None, BlockBody::image("ftp://x.png", 10.0, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(error, EditorError::Validation(_)));
        assert_eq!(coordinator.current(), before);
    }

    #[tokio::test]
    async fn test_unknown_page_is_reported() {
        let coordinator = coordinator();
        let ghost = PageId::from("ghost");

        let error = coordinator.delete_block(&ghost, &BlockId::from("b")).await.unwrap_err();
        assert!(error.is_stale());
        assert!(!coordinator.select_page(&ghost));
    }

    #[tokio::test]
    async fn test_no_op_block_mutation_sends_nothing() {
        let store = Arc::new(PageStore::in_memory());
        let coordinator = Coordinator::new(LocalGateway::new(Arc::clone(&store)));
        let page = coordinator.create_page("Notes").await.unwrap();

        // Remove the page behind the coordinator's back; an unchanged block
        // list must not attempt a replace that would now fail.
        store.delete_page(&page.id).unwrap();
        coordinator
            .delete_block(&page.id, &BlockId::from("missing"))
            .await
            .unwrap();
        assert!(coordinator.current().error.is_none());
    }

    #[tokio::test]
    async fn test_clear_error() {
        let coordinator = coordinator();
        coordinator.state.send_modify(|s| s.error = Some("boom".into()));
        coordinator.clear_error();
        assert!(coordinator.current().error.is_none());
    }
}
