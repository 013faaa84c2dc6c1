use blockpad_document::BlockId;

/// At most one selected block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(BlockId),
}

impl Selection {
    pub fn select(&mut self, id: BlockId) {
        *self = Selection::Selected(id);
    }

    pub fn clear(&mut self) {
        *self = Selection::Unselected;
    }

    pub fn selected(&self) -> Option<&BlockId> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn is_selected(&self, id: &BlockId) -> bool {
        self.selected() == Some(id)
    }

    /// Drop the selection if it points at `id`.
    pub fn forget(&mut self, id: &BlockId) {
        if self.is_selected(id) {
            self.clear();
        }
    }
}
