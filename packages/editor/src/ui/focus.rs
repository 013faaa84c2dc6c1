use blockpad_document::{BlockId, PageId};

/// What should receive keyboard focus after the last action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    None,
    Block(BlockId),
    PageTitle(PageId),
}
