//! Optimistic transaction behavior: apply, confirm, roll back.

use async_trait::async_trait;
use blockpad_document::{Block, BlockBody, BlockId, DropSide, Page, PageId, TextVariant};
use blockpad_editor::{
    Coordinator, DocumentState, EditorError, GatewayError, GatewayResult, LocalGateway,
    PersistenceGateway, RenameOutcome,
};
use blockpad_storage::PageStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

type Gate = oneshot::Receiver<GatewayResult<()>>;

/// Store-backed gateway whose calls can be held open or made to fail.
struct ScriptedGateway {
    inner: LocalGateway,
    calls: AtomicUsize,
    failures: Mutex<VecDeque<GatewayError>>,
    gates: Mutex<VecDeque<Gate>>,
}

impl ScriptedGateway {
    fn new() -> Self {
        Self {
            inner: LocalGateway::new(Arc::new(PageStore::in_memory())),
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
            gates: Mutex::new(VecDeque::new()),
        }
    }

    fn store(&self) -> &PageStore {
        self.inner.store()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail_next(&self, error: GatewayError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// The next call waits until the returned sender decides its outcome.
    fn hold_next(&self) -> oneshot::Sender<GatewayResult<()>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    async fn before_call(&self) -> GatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            return gate.await.unwrap_or(Ok(()));
        }
        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PersistenceGateway for ScriptedGateway {
    async fn list_pages(&self) -> GatewayResult<Vec<Page>> {
        self.before_call().await?;
        self.inner.list_pages().await
    }

    async fn create_page(&self, page: &Page) -> GatewayResult<Page> {
        self.before_call().await?;
        self.inner.create_page(page).await
    }

    async fn replace_page(&self, page: &Page) -> GatewayResult<Page> {
        self.before_call().await?;
        self.inner.replace_page(page).await
    }

    async fn delete_page(&self, id: &PageId) -> GatewayResult<()> {
        self.before_call().await?;
        self.inner.delete_page(id).await
    }

    async fn replace_page_order(&self, pages: &[Page]) -> GatewayResult<Vec<Page>> {
        self.before_call().await?;
        self.inner.replace_page_order(pages).await
    }

    async fn list_blocks(&self) -> GatewayResult<Vec<Block>> {
        self.before_call().await?;
        self.inner.list_blocks().await
    }

    async fn create_block(&self, body: &BlockBody) -> GatewayResult<Block> {
        self.before_call().await?;
        self.inner.create_block(body).await
    }

    async fn update_block(&self, id: &BlockId, body: &BlockBody) -> GatewayResult<Block> {
        self.before_call().await?;
        self.inner.update_block(id, body).await
    }

    async fn delete_block(&self, id: &BlockId) -> GatewayResult<()> {
        self.before_call().await?;
        self.inner.delete_block(id).await
    }

    async fn reorder_blocks(&self, ids: &[BlockId]) -> GatewayResult<Vec<Block>> {
        self.before_call().await?;
        self.inner.reorder_blocks(ids).await
    }
}

fn server_error() -> GatewayError {
    GatewayError::Rejected {
        status: 500,
        message: "disk full".to_string(),
    }
}

fn text(content: &str) -> BlockBody {
    BlockBody::text(content, TextVariant::Paragraph)
}

/// Coordinator holding one page with blocks `a`, `b`, `c` in order.
async fn seeded() -> (Coordinator<ScriptedGateway>, PageId, Vec<BlockId>) {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let page = coordinator.create_page("Notes").await.unwrap();

    let mut ids = Vec::new();
    for content in ["a", "b", "c"] {
        let id = coordinator
            .insert_block(&page.id, ids.last(), text(content))
            .await
            .unwrap();
        ids.push(id);
    }

    (coordinator, page.id, ids)
}

fn contents(coordinator: &Coordinator<ScriptedGateway>, page_id: &PageId) -> Vec<String> {
    coordinator
        .current()
        .page(page_id)
        .unwrap()
        .blocks
        .iter()
        .map(|b| b.body.content().to_string())
        .collect()
}

#[tokio::test]
async fn test_block_mutations_persist_the_whole_page() {
    let (coordinator, page_id, ids) = seeded().await;

    coordinator
        .move_block(&page_id, &ids[0], &ids[2], DropSide::After)
        .await
        .unwrap();
    coordinator
        .update_block(&page_id, &ids[1], BlockBody::text("B", TextVariant::H1))
        .await
        .unwrap();

    assert_eq!(contents(&coordinator, &page_id), ["B", "c", "a"]);
    let stored = coordinator.gateway().store().list_pages().unwrap();
    assert_eq!(stored, coordinator.current().pages);
    assert_eq!(stored[0].blocks[0].id, ids[1]);
}

#[tokio::test]
async fn test_failed_block_mutations_restore_exact_pre_image() {
    let (coordinator, page_id, ids) = seeded().await;
    let before = coordinator.current();

    coordinator.gateway().fail_next(server_error());
    let error = coordinator
        .move_block(&page_id, &ids[2], &ids[0], DropSide::Before)
        .await
        .unwrap_err();
    assert!(matches!(error, EditorError::Gateway(_)));

    coordinator.gateway().fail_next(server_error());
    coordinator
        .update_block(&page_id, &ids[0], BlockBody::image("https://x.png", 10.0, 10.0))
        .await
        .unwrap_err();

    coordinator.gateway().fail_next(server_error());
    coordinator.delete_block(&page_id, &ids[1]).await.unwrap_err();

    coordinator.gateway().fail_next(server_error());
    coordinator
        .insert_block(&page_id, None, text("d"))
        .await
        .unwrap_err();

    let after = coordinator.current();
    assert_eq!(after.pages, before.pages);
    assert_eq!(after.active_page, before.active_page);
    assert_eq!(after.error.as_deref(), Some("disk full"));
    assert_eq!(coordinator.gateway().store().list_pages().unwrap(), before.pages);
}

#[tokio::test]
async fn test_subscribers_see_optimistic_state_before_confirmation() {
    let (coordinator, page_id, _) = seeded().await;
    let release = coordinator.gateway().hold_next();
    let updates = coordinator.subscribe();

    let mutation = coordinator.insert_block(&page_id, None, text("d"));
    let observer = async {
        tokio::task::yield_now().await;
        let seen = contents(&coordinator, &page_id);
        let changed = updates.has_changed().unwrap();
        release.send(Ok(())).unwrap();
        (seen, changed)
    };

    let (result, (seen, changed)) = tokio::join!(mutation, observer);
    result.unwrap();
    assert!(changed);
    assert_eq!(seen, ["a", "b", "c", "d"]);
    assert_eq!(
        coordinator.gateway().store().list_pages().unwrap()[0].blocks.len(),
        4
    );
}

#[tokio::test]
async fn test_rename_skips_unchanged_and_empty_titles() {
    let (coordinator, page_id, _) = seeded().await;
    let calls = coordinator.gateway().calls();
    let before = coordinator.current();

    let outcome = coordinator.rename_page(&page_id, "  Notes  ").await.unwrap();
    assert_eq!(outcome, RenameOutcome::Unchanged);

    let outcome = coordinator.rename_page(&page_id, "   ").await.unwrap();
    assert_eq!(outcome, RenameOutcome::Discarded);

    assert_eq!(coordinator.gateway().calls(), calls);
    assert_eq!(coordinator.current(), before);

    let outcome = coordinator.rename_page(&page_id, " Journal ").await.unwrap();
    assert_eq!(outcome, RenameOutcome::Renamed);
    assert_eq!(coordinator.current().page(&page_id).unwrap().title, "Journal");
    assert_eq!(coordinator.gateway().calls(), calls + 1);
}

#[tokio::test]
async fn test_failed_rename_restores_title() {
    let (coordinator, page_id, _) = seeded().await;

    coordinator.gateway().fail_next(GatewayError::Rejected {
        status: 404,
        message: "Page not found: gone".to_string(),
    });
    let error = coordinator.rename_page(&page_id, "Journal").await.unwrap_err();

    assert_eq!(error.to_string(), "Page not found: gone");
    let state = coordinator.current();
    assert_eq!(state.page(&page_id).unwrap().title, "Notes");
    assert_eq!(state.error.as_deref(), Some("Page not found: gone"));
}

#[tokio::test]
async fn test_failed_create_undoes_insert_and_selection() {
    let (coordinator, page_id, _) = seeded().await;
    let before = coordinator.current();
    assert_eq!(before.active_page, Some(page_id.clone()));

    coordinator.gateway().fail_next(GatewayError::Rejected {
        status: 409,
        message: "Page already exists".to_string(),
    });
    coordinator.create_page("Second").await.unwrap_err();

    let after = coordinator.current();
    assert_eq!(after.pages, before.pages);
    assert_eq!(after.active_page, Some(page_id));
}

#[tokio::test]
async fn test_create_page_keeps_client_id() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let page = coordinator.create_page("Notes").await.unwrap();

    let stored = coordinator.gateway().store().list_pages().unwrap();
    assert_eq!(stored[0].id, page.id);
}

#[tokio::test]
async fn test_invalid_title_never_reaches_gateway() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let error = coordinator.create_page("  ").await.unwrap_err();

    assert!(matches!(error, EditorError::Validation(_)));
    assert_eq!(coordinator.gateway().calls(), 0);
    assert!(coordinator.current().pages.is_empty());
}

#[tokio::test]
async fn test_delete_active_page_selects_first_remaining() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let first = coordinator.create_page("First").await.unwrap();
    let second = coordinator.create_page("Second").await.unwrap();
    assert_eq!(coordinator.current().active_page, Some(second.id.clone()));

    coordinator.gateway().fail_next(server_error());
    coordinator.delete_page(&second.id).await.unwrap_err();
    let state = coordinator.current();
    assert_eq!(state.pages.len(), 2);
    assert_eq!(state.active_page, Some(second.id.clone()));

    coordinator.delete_page(&second.id).await.unwrap();
    let state = coordinator.current();
    assert_eq!(state.pages, vec![first.clone()]);
    assert_eq!(state.active_page, Some(first.id.clone()));

    coordinator.delete_page(&first.id).await.unwrap();
    assert_eq!(coordinator.current().active_page, None);
}

#[tokio::test]
async fn test_move_page_sends_full_order() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let a = coordinator.create_page("A").await.unwrap();
    let b = coordinator.create_page("B").await.unwrap();
    let c = coordinator.create_page("C").await.unwrap();

    coordinator.move_page(&a.id, &c.id, DropSide::After).await.unwrap();
    let order: Vec<PageId> = coordinator.current().pages.into_iter().map(|p| p.id).collect();
    assert_eq!(order, vec![b.id.clone(), c.id.clone(), a.id.clone()]);

    let stored: Vec<PageId> = coordinator
        .gateway()
        .store()
        .list_pages()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(stored, order);

    // Dropping a page onto its current position sends nothing
    let calls = coordinator.gateway().calls();
    coordinator.move_page(&b.id, &c.id, DropSide::Before).await.unwrap();
    assert_eq!(coordinator.gateway().calls(), calls);
}

#[tokio::test]
async fn test_failed_page_reorder_rolls_back() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    let a = coordinator.create_page("A").await.unwrap();
    let b = coordinator.create_page("B").await.unwrap();
    let before = coordinator.current();

    coordinator.gateway().fail_next(server_error());
    coordinator
        .reorder_pages(vec![b.clone(), a.clone()])
        .await
        .unwrap_err();
    assert_eq!(coordinator.current().pages, before.pages);

    // A stale order that is not a permutation is refused by the store
    coordinator.reorder_pages(vec![b]).await.unwrap_err();
    assert_eq!(coordinator.current().pages, before.pages);
}

#[tokio::test]
async fn test_load_pages_replaces_state() {
    let gateway = ScriptedGateway::new();
    gateway.store().create_page(Page::new("Stored").unwrap()).unwrap();
    let coordinator = Coordinator::new(gateway);

    coordinator.load_pages(&CancellationToken::new()).await.unwrap();
    let state = coordinator.current();
    assert_eq!(state.pages.len(), 1);
    assert_eq!(state.active().unwrap().title, "Stored");
}

#[tokio::test]
async fn test_failed_load_sets_banner() {
    let coordinator = Coordinator::new(ScriptedGateway::new());
    coordinator
        .gateway()
        .fail_next(GatewayError::Transport("connection refused".to_string()));

    coordinator.load_pages(&CancellationToken::new()).await.unwrap_err();
    assert_eq!(
        coordinator.current().error.as_deref(),
        Some("Network error: connection refused")
    );

    coordinator.clear_error();
    assert_eq!(coordinator.current().error, None);
}

#[tokio::test]
async fn test_cancelled_load_leaves_state_untouched() {
    let gateway = ScriptedGateway::new();
    gateway.store().create_page(Page::new("Stored").unwrap()).unwrap();
    let coordinator = Coordinator::new(gateway);
    let release = coordinator.gateway().hold_next();
    let cancel = CancellationToken::new();

    let load = coordinator.load_pages(&cancel);
    let teardown = async {
        tokio::task::yield_now().await;
        cancel.cancel();
        let _ = release.send(Ok(()));
    };

    let (result, ()) = tokio::join!(load, teardown);
    assert!(matches!(result, Err(EditorError::Cancelled)));
    assert_eq!(coordinator.current(), DocumentState::default());
}

#[tokio::test]
async fn test_overlapping_failure_discards_later_optimistic_change() {
    let (coordinator, page_id, ids) = seeded().await;
    let before = coordinator.current();

    let first = coordinator.gateway().hold_next();
    let second = coordinator.gateway().hold_next();

    let edit = coordinator.update_block(&page_id, &ids[0], text("edited"));
    let insert = coordinator.insert_block(&page_id, None, text("d"));
    let driver = async {
        tokio::task::yield_now().await;
        second.send(Ok(())).unwrap();
        first.send(Err(server_error())).unwrap();
    };

    let (edit, insert, ()) = tokio::join!(edit, insert, driver);
    assert!(edit.is_err());
    assert!(insert.is_ok());

    // The earlier rollback wins locally while the later write reached the store
    assert_eq!(coordinator.current().pages, before.pages);
    let stored = coordinator.gateway().store().list_pages().unwrap();
    assert_eq!(stored[0].blocks.len(), 4);
}
