//! Client-side document state: the page list the editor renders.

use blockpad_document::{Page, PageId};

/// Everything the UI renders from: pages in sidebar order, the page being
/// edited, and the current error banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentState {
    pub pages: Vec<Page>,
    pub active_page: Option<PageId>,
    pub error: Option<String>,
}

impl DocumentState {
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub(crate) fn page_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    /// The page currently open in the editor, if any.
    pub fn active(&self) -> Option<&Page> {
        self.active_page.as_ref().and_then(|id| self.page(id))
    }

    /// Keep the current selection if it still exists, else fall back to the first page.
    pub(crate) fn settle_selection(&mut self) {
        let still_present = self
            .active_page
            .as_ref()
            .is_some_and(|id| self.page(id).is_some());
        if !still_present {
            self.active_page = self.pages.first().map(|p| p.id.clone());
        }
    }
}
