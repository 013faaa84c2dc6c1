//! # Blockpad Document
//!
//! Data model and pure transforms for the Blockpad block editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: Page / Block model                │
//! │  - Client-generated ids (UUID v4)           │
//! │  - Shared validation rules                  │
//! │  - Pure insert / remove / update / reorder  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ storage: JSON collections + page service    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: optimistic coordinator + UI state   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Client owns identity**: ids are minted before the backend sees an entity
//! 2. **List position is order**: there is no rank field on blocks or pages
//! 3. **Type and shape move together**: a block body is replaced whole, never patched
//! 4. **One rule set**: the editor and the storage boundary call the same validator
//!
//! ## Usage
//!
//! ```rust
//! use blockpad_document::{insert_after, Block, BlockBody, TextVariant};
//!
//! let first = Block::new(BlockBody::text("Hello", TextVariant::H1));
//! let second = Block::new(BlockBody::text("", TextVariant::Paragraph));
//!
//! let blocks = insert_after(&[first.clone()], Some(&first.id), second.clone());
//! assert_eq!(blocks[1].id, second.id);
//! ```

mod block;
mod ids;
mod model;
mod page;
mod validate;

pub use block::{Block, BlockBody, BlockKind, ImageStyles, TextStyles, TextVariant};
pub use ids::{BlockId, PageId};
pub use model::{
    insert_after, remove, reorder_by_dragged_target, reorder_pages, update_block, DropSide, Keyed,
};
pub use page::{Page, IMPORTED_PAGE_TITLE};
pub use validate::{
    normalize_title, validate_block, validate_page, ValidationError, TEXT_VARIANTS,
};
