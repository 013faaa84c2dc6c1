//! # Edit Session
//!
//! One user's editor: the coordinator plus every UI state machine, driven
//! by [`Intent`]s through [`EditSession::dispatch`].
//!
//! Intents that make no sense in the current state (choosing a block type
//! with the menu closed, dropping while idle) are ignored. Intents naming a
//! page that has disappeared resolve to no-ops. Gateway failures are returned
//! after the coordinator has rolled back, so the caller can show them.

use crate::coordinator::Coordinator;
use crate::gateway::PersistenceGateway;
use crate::probe::ImageProbe;
use crate::state::DocumentState;
use crate::ui::{
    BlockMenu, DragState, Focus, ImageModal, InsertionPoint, MenuPosition, Selection, TitleEdit,
};
use crate::EditorError;
use blockpad_document::{BlockBody, BlockId, BlockKind, DropSide, PageId, TextVariant};
use tokio_util::sync::CancellationToken;

/// Everything a user can ask the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // Pages
    SelectPage(PageId),
    CreatePage { title: String },
    DeletePage(PageId),
    MovePage { dragged: PageId, target: PageId, side: DropSide },

    // Page title
    BeginTitleEdit,
    EditTitle(String),
    CommitTitle,

    // Block selection
    SelectBlock(BlockId),
    ClickOutside,
    Escape,

    // Block menu and image modal
    OpenBlockMenu { position: MenuPosition, at: InsertionPoint },
    ChooseBlockType(BlockKind),
    EditImageUrl(String),
    SubmitImage,

    // Block edits
    UpdateBlock { block_id: BlockId, body: BlockBody },
    DeleteBlock(BlockId),
    DeleteSelectedBlock,

    // Block drag-and-drop
    DragStart(BlockId),
    DragOver { target: BlockId, side: DropSide },
    Drop,
    DragEnd,

    DismissError,
}

pub struct EditSession<G, P> {
    coordinator: Coordinator<G>,
    probe: P,
    selection: Selection,
    block_menu: BlockMenu,
    image_modal: ImageModal,
    title_edit: TitleEdit,
    drag: DragState,
    focus: Focus,
}

impl<G: PersistenceGateway, P: ImageProbe> EditSession<G, P> {
    pub fn new(coordinator: Coordinator<G>, probe: P) -> Self {
        Self {
            coordinator,
            probe,
            selection: Selection::default(),
            block_menu: BlockMenu::default(),
            image_modal: ImageModal::default(),
            title_edit: TitleEdit::default(),
            drag: DragState::default(),
            focus: Focus::default(),
        }
    }

    pub fn coordinator(&self) -> &Coordinator<G> {
        &self.coordinator
    }

    pub fn document(&self) -> DocumentState {
        self.coordinator.current()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn block_menu(&self) -> &BlockMenu {
        &self.block_menu
    }

    pub fn image_modal(&self) -> &ImageModal {
        &self.image_modal
    }

    pub fn title_edit(&self) -> &TitleEdit {
        &self.title_edit
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Initial page fetch.
    pub async fn load(&mut self, cancel: &CancellationToken) -> Result<(), EditorError> {
        self.coordinator.load_pages(cancel).await?;
        self.reset_transient();
        Ok(())
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Result<(), EditorError> {
        tracing::trace!(?intent, "Dispatching intent");

        match self.apply(intent).await {
            Err(error) if error.is_stale() => {
                tracing::debug!(error = %error, "Ignoring intent for stale reference");
                Ok(())
            }
            other => other,
        }
    }

    async fn apply(&mut self, intent: Intent) -> Result<(), EditorError> {
        match intent {
            Intent::SelectPage(id) => {
                let already_active = self.active_page_id().as_ref() == Some(&id);
                if !already_active && self.coordinator.select_page(&id) {
                    self.reset_transient();
                }
                Ok(())
            }
            Intent::CreatePage { title } => {
                let page = self.coordinator.create_page(&title).await?;
                self.reset_transient();
                self.title_edit.begin(&page.title);
                self.focus = Focus::PageTitle(page.id);
                Ok(())
            }
            Intent::DeletePage(id) => {
                if self.active_page_id().as_ref() == Some(&id) {
                    self.reset_transient();
                }
                self.coordinator.delete_page(&id).await
            }
            Intent::MovePage {
                dragged,
                target,
                side,
            } => self.coordinator.move_page(&dragged, &target, side).await,

            Intent::BeginTitleEdit => {
                if let Some(page) = self.coordinator.current().active() {
                    self.title_edit.begin(&page.title);
                }
                Ok(())
            }
            Intent::EditTitle(draft) => {
                self.title_edit.set_draft(draft);
                Ok(())
            }
            Intent::CommitTitle => self.commit_title().await,

            Intent::SelectBlock(id) => {
                let exists = self
                    .coordinator
                    .current()
                    .active()
                    .is_some_and(|page| page.block(&id).is_some());
                if exists {
                    self.selection.select(id);
                }
                Ok(())
            }
            Intent::ClickOutside => {
                self.selection.clear();
                self.block_menu.close();
                Ok(())
            }
            Intent::Escape => {
                if self.block_menu.is_open() {
                    self.block_menu.close();
                } else if self.image_modal.is_open() {
                    self.image_modal.close();
                } else if self.title_edit.is_editing() {
                    self.title_edit.cancel();
                } else {
                    self.selection.clear();
                }
                Ok(())
            }

            Intent::OpenBlockMenu { position, at } => {
                if !self.image_modal.is_open() {
                    self.block_menu.open(position, at);
                }
                Ok(())
            }
            Intent::ChooseBlockType(kind) => {
                let Some(at) = self.block_menu.take() else {
                    return Ok(());
                };
                tracing::debug!(kind = %kind, ?at, "Block type chosen");
                match kind {
                    BlockKind::Text => {
                        self.insert(at, BlockBody::text("", TextVariant::Paragraph))
                            .await
                    }
                    BlockKind::Image => {
                        self.image_modal.open(at);
                        Ok(())
                    }
                }
            }
            Intent::EditImageUrl(url) => {
                self.image_modal.set_url(url);
                Ok(())
            }
            Intent::SubmitImage => self.submit_image().await,

            Intent::UpdateBlock { block_id, body } => {
                let Some(page_id) = self.active_page_id() else {
                    return Ok(());
                };
                self.coordinator.update_block(&page_id, &block_id, body).await
            }
            Intent::DeleteBlock(id) => self.delete_block(id).await,
            Intent::DeleteSelectedBlock => match self.selection.selected().cloned() {
                Some(id) => self.delete_block(id).await,
                None => Ok(()),
            },

            Intent::DragStart(id) => {
                self.drag.start(id);
                Ok(())
            }
            Intent::DragOver { target, side } => {
                self.drag.hover(target, side);
                Ok(())
            }
            Intent::Drop => {
                let request = self.drag.release();
                self.selection.clear();
                match (request, self.active_page_id()) {
                    (Some(request), Some(page_id)) => {
                        self.coordinator
                            .move_block(&page_id, &request.dragged, &request.target, request.side)
                            .await
                    }
                    _ => Ok(()),
                }
            }
            Intent::DragEnd => {
                self.drag.end();
                self.selection.clear();
                Ok(())
            }

            Intent::DismissError => {
                self.coordinator.clear_error();
                Ok(())
            }
        }
    }

    fn active_page_id(&self) -> Option<PageId> {
        self.coordinator.current().active_page
    }

    /// Clear everything tied to the page that was on screen.
    fn reset_transient(&mut self) {
        self.selection.clear();
        self.block_menu.close();
        self.image_modal.close();
        self.title_edit.cancel();
        self.drag.end();
        self.focus = Focus::None;
    }

    async fn insert(&mut self, at: InsertionPoint, body: BlockBody) -> Result<(), EditorError> {
        let Some(page_id) = self.active_page_id() else {
            return Ok(());
        };
        let id = self
            .coordinator
            .insert_block(&page_id, at.anchor(), body)
            .await?;
        self.focus = Focus::Block(id);
        Ok(())
    }

    async fn delete_block(&mut self, id: BlockId) -> Result<(), EditorError> {
        self.selection.forget(&id);
        if self.focus == Focus::Block(id.clone()) {
            self.focus = Focus::None;
        }
        let Some(page_id) = self.active_page_id() else {
            return Ok(());
        };
        self.coordinator.delete_block(&page_id, &id).await
    }

    async fn commit_title(&mut self) -> Result<(), EditorError> {
        let Some(draft) = self.title_edit.draft().map(str::to_string) else {
            return Ok(());
        };
        let Some(page_id) = self.active_page_id() else {
            self.title_edit.cancel();
            return Ok(());
        };

        match self.coordinator.rename_page(&page_id, &draft).await {
            Ok(outcome) => {
                tracing::debug!(page_id = %page_id, ?outcome, "Title committed");
                self.title_edit.cancel();
                Ok(())
            }
            Err(error) if error.is_stale() => {
                self.title_edit.cancel();
                Err(error)
            }
            Err(error) => {
                self.title_edit.fail(error.to_string());
                Err(error)
            }
        }
    }

    async fn submit_image(&mut self) -> Result<(), EditorError> {
        let Some((url, at)) = self.image_modal.submission() else {
            return Ok(());
        };

        match self.create_image(&url, &at).await {
            Ok(Some(id)) => {
                self.image_modal.close();
                self.focus = Focus::Block(id);
                Ok(())
            }
            Ok(None) => {
                self.image_modal.close();
                Ok(())
            }
            Err(error) if error.is_stale() => {
                self.image_modal.close();
                Err(error)
            }
            Err(error) => {
                self.image_modal.fail(error.to_string());
                Err(error)
            }
        }
    }

    async fn create_image(&self, url: &str, at: &InsertionPoint) -> Result<Option<BlockId>, EditorError> {
        let Some(page_id) = self.active_page_id() else {
            return Ok(None);
        };

        // Placeholder dimensions: only the URL rule can fail here.
        BlockBody::image(url, 1.0, 1.0).validate()?;

        let dimensions = self.probe.dimensions(url).await?;
        let body = BlockBody::image(url, f64::from(dimensions.width), f64::from(dimensions.height));
        let id = self
            .coordinator
            .insert_block(&page_id, at.anchor(), body)
            .await?;
        Ok(Some(id))
    }
}
