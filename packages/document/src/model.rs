//! # Document Transforms
//!
//! Pure functions deriving a new block or page list from an existing one.
//!
//! ## Semantics
//!
//! - Inputs are borrowed and never modified; every call returns a fresh list
//! - List position is the ordering, there is no separate rank
//! - Unknown ids never fail: inserts fall back to appending, everything
//!   else returns the list unchanged. The caller may be holding an id that a
//!   racing mutation already removed.

use crate::block::{Block, BlockBody};
use crate::ids::{BlockId, PageId};
use crate::page::Page;

/// Items addressable by a unique key within their list.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> &Self::Key;
}

impl Keyed for Block {
    type Key = BlockId;

    fn key(&self) -> &BlockId {
        &self.id
    }
}

impl Keyed for Page {
    type Key = PageId;

    fn key(&self) -> &PageId {
        &self.id
    }
}

/// Which side of the drop target the dragged item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropSide {
    Before,
    After,
}

/// Insert `item` right after `anchor`, or at the end when the anchor is
/// `None` or not present.
pub fn insert_after<T: Keyed + Clone>(items: &[T], anchor: Option<&T::Key>, item: T) -> Vec<T> {
    let mut next = items.to_vec();
    let position = anchor.and_then(|key| items.iter().position(|i| i.key() == key));

    match position {
        Some(index) => next.insert(index + 1, item),
        None => next.push(item),
    }

    next
}

/// Drop the item with `key`. Absent keys yield an equal list.
pub fn remove<T: Keyed + Clone>(items: &[T], key: &T::Key) -> Vec<T> {
    items.iter().filter(|i| i.key() != key).cloned().collect()
}

/// Replace the body of block `id`, keeping its id and position.
///
/// The body is swapped whole (type, content and styles together).
pub fn update_block(blocks: &[Block], id: &BlockId, body: BlockBody) -> Vec<Block> {
    blocks
        .iter()
        .map(|block| {
            if &block.id == id {
                Block {
                    id: block.id.clone(),
                    body: body.clone(),
                }
            } else {
                block.clone()
            }
        })
        .collect()
}

/// Move `dragged` next to `target` on the requested side.
///
/// The dragged item is removed first. When it sat above the target, that
/// removal shifts the target up by one, so the insertion index is computed
/// against the post-removal list. `[A,B,C,D]` with `D` before `B` gives
/// `[A,D,B,C]`; `A` after `C` gives `[B,C,A,D]`.
pub fn reorder_by_dragged_target<T: Keyed + Clone>(
    items: &[T],
    dragged: &T::Key,
    target: &T::Key,
    side: DropSide,
) -> Vec<T> {
    let from = items.iter().position(|i| i.key() == dragged);
    let to = items.iter().position(|i| i.key() == target);

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) if from != to => (from, to),
        _ => return items.to_vec(),
    };

    let mut next = items.to_vec();
    let moved = next.remove(from);

    let target_index = if from < to { to - 1 } else { to };
    let insert_at = match side {
        DropSide::Before => target_index,
        DropSide::After => target_index + 1,
    };

    next.insert(insert_at, moved);
    next
}

/// Replace the page list with a caller-supplied ordering.
///
/// The caller owns the full permutation; it is taken as given.
pub fn reorder_pages(_pages: &[Page], ordered: &[Page]) -> Vec<Page> {
    ordered.to_vec()
}
