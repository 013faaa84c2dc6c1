//! # Page Store
//!
//! The persistence service behind the Blockpad API.
//!
//! Every operation loads the affected collection, applies its change and
//! saves the whole array back. A process-wide mutex makes each
//! read-modify-write atomic with respect to the others; separate processes
//! sharing the same files are not coordinated.
//!
//! ## Identity
//!
//! Pages and blocks in a page arrive with client-generated ids, which are
//! stored unchanged. Only the legacy flat block collection derives ids
//! itself, for creates that carry no id.
//!
//! ## Reorders
//!
//! Reorders carry positions, never content: the submitted ids must be an
//! exact permutation of the stored ids, and the stored records are rearranged
//! to match. A stale reorder payload therefore cannot discard edits made
//! since it was built.

use crate::collection::{Collection, JsonFileCollection, MemoryCollection};
use crate::errors::{StoreError, StoreResult};
use blockpad_document::{Block, BlockBody, BlockId, Page, PageId, IMPORTED_PAGE_TITLE};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

pub const PAGES_FILE: &str = "pages.json";
pub const BLOCKS_FILE: &str = "blocks.json";

pub struct PageStore {
    pages: Box<dyn Collection<Page>>,
    legacy_blocks: Box<dyn Collection<Block>>,
    write_lock: Mutex<()>,
}

impl PageStore {
    pub fn new(
        pages: impl Collection<Page> + 'static,
        legacy_blocks: impl Collection<Block> + 'static,
    ) -> Self {
        Self {
            pages: Box::new(pages),
            legacy_blocks: Box::new(legacy_blocks),
            write_lock: Mutex::new(()),
        }
    }

    /// File-backed store using the default file names inside `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        Self::open_files(&data_dir.join(PAGES_FILE), &data_dir.join(BLOCKS_FILE))
    }

    pub fn open_files(pages_path: &Path, blocks_path: &Path) -> Self {
        Self::new(
            JsonFileCollection::<Page>::new(pages_path),
            JsonFileCollection::<Block>::new(blocks_path),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryCollection::<Page>::new(), MemoryCollection::<Block>::new())
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// All pages in sidebar order.
    ///
    /// When there are no pages yet but the legacy flat block collection has
    /// content, a single "Imported Page" wrapping those blocks is created and
    /// persisted. Once pages exist the legacy collection is ignored, so the
    /// import happens at most once. Legacy blocks that fail validation are
    /// left out so the imported page can be saved again.
    pub fn list_pages(&self) -> StoreResult<Vec<Page>> {
        let _guard = self.write_lock.lock();

        let pages = self.pages.load_collection()?;
        if !pages.is_empty() {
            return Ok(pages);
        }

        let legacy = self.legacy_blocks.load_collection()?;
        if legacy.is_empty() {
            return Ok(pages);
        }

        let imported = Page {
            id: PageId::new(),
            title: IMPORTED_PAGE_TITLE.to_string(),
            blocks: importable_blocks(legacy),
        };
        tracing::info!(
            page_id = %imported.id,
            blocks = imported.blocks.len(),
            "Imported legacy blocks into a new page"
        );

        let pages = vec![imported];
        self.pages.save_collection(&pages)?;
        Ok(pages)
    }

    pub fn create_page(&self, page: Page) -> StoreResult<Page> {
        page.validate()?;
        let _guard = self.write_lock.lock();

        let mut pages = self.pages.load_collection()?;
        if pages.iter().any(|p| p.id == page.id) {
            return Err(StoreError::Conflict {
                kind: "Page",
                id: page.id.to_string(),
            });
        }

        pages.push(page.clone());
        self.pages.save_collection(&pages)?;
        tracing::debug!(page_id = %page.id, "Created page");
        Ok(page)
    }

    /// Replace one page wholesale. The id in `id` must match the body.
    pub fn replace_page(&self, id: &PageId, page: Page) -> StoreResult<Page> {
        if &page.id != id {
            return Err(StoreError::IdMismatch {
                path: id.to_string(),
                body: page.id.to_string(),
            });
        }
        page.validate()?;
        let _guard = self.write_lock.lock();

        let mut pages = self.pages.load_collection()?;
        let slot = pages
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::page_not_found(id))?;
        *slot = page.clone();

        self.pages.save_collection(&pages)?;
        tracing::debug!(page_id = %id, blocks = page.blocks.len(), "Replaced page");
        Ok(page)
    }

    pub fn delete_page(&self, id: &PageId) -> StoreResult<()> {
        let _guard = self.write_lock.lock();

        let pages = self.pages.load_collection()?;
        if !pages.iter().any(|p| &p.id == id) {
            return Err(StoreError::page_not_found(id));
        }

        let remaining: Vec<Page> = pages.into_iter().filter(|p| &p.id != id).collect();
        self.pages.save_collection(&remaining)?;
        tracing::debug!(page_id = %id, "Deleted page");
        Ok(())
    }

    /// Persist a new sidebar order.
    ///
    /// The submitted pages must be well-formed and their ids must be a
    /// permutation of the stored ids. Stored content is kept; only the order
    /// of the submission is applied.
    pub fn replace_page_order(&self, ordered: Vec<Page>) -> StoreResult<Vec<Page>> {
        for page in &ordered {
            page.validate()?;
        }
        let _guard = self.write_lock.lock();

        let stored = self.pages.load_collection()?;
        let stored_ids: Vec<PageId> = stored.iter().map(|p| p.id.clone()).collect();
        let submitted: Vec<PageId> = ordered.into_iter().map(|p| p.id).collect();
        check_permutation(&stored_ids, &submitted)?;

        let reordered = arrange(stored, &submitted, |p| p.id.clone());
        self.pages.save_collection(&reordered)?;
        tracing::debug!(pages = reordered.len(), "Reordered pages");
        Ok(reordered)
    }

    // ------------------------------------------------------------------
    // Legacy flat blocks
    // ------------------------------------------------------------------

    pub fn list_blocks(&self) -> StoreResult<Vec<Block>> {
        let _guard = self.write_lock.lock();
        self.legacy_blocks.load_collection()
    }

    /// Append a block, deriving its id here.
    pub fn create_block(&self, body: BlockBody) -> StoreResult<Block> {
        body.validate()?;
        let _guard = self.write_lock.lock();

        let mut blocks = self.legacy_blocks.load_collection()?;
        let block = Block::new(body);
        blocks.push(block.clone());

        self.legacy_blocks.save_collection(&blocks)?;
        tracing::debug!(block_id = %block.id, "Created legacy block");
        Ok(block)
    }

    pub fn update_block(&self, id: &BlockId, body: BlockBody) -> StoreResult<Block> {
        body.validate()?;
        let _guard = self.write_lock.lock();

        let mut blocks = self.legacy_blocks.load_collection()?;
        let slot = blocks
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| StoreError::block_not_found(id))?;
        slot.body = body;
        let updated = slot.clone();

        self.legacy_blocks.save_collection(&blocks)?;
        Ok(updated)
    }

    pub fn delete_block(&self, id: &BlockId) -> StoreResult<()> {
        let _guard = self.write_lock.lock();

        let blocks = self.legacy_blocks.load_collection()?;
        if !blocks.iter().any(|b| &b.id == id) {
            return Err(StoreError::block_not_found(id));
        }

        let remaining: Vec<Block> = blocks.into_iter().filter(|b| &b.id != id).collect();
        self.legacy_blocks.save_collection(&remaining)?;
        Ok(())
    }

    /// Rearrange the legacy blocks to the order of `ids`.
    pub fn reorder_blocks(&self, ids: &[BlockId]) -> StoreResult<Vec<Block>> {
        let _guard = self.write_lock.lock();

        let stored = self.legacy_blocks.load_collection()?;
        let stored_ids: Vec<BlockId> = stored.iter().map(|b| b.id.clone()).collect();
        check_permutation(&stored_ids, ids)?;

        let reordered = arrange(stored, ids, |b| b.id.clone());
        self.legacy_blocks.save_collection(&reordered)?;
        Ok(reordered)
    }
}

/// Reject anything that is not exactly a permutation of `existing`.
fn check_permutation<K>(existing: &[K], submitted: &[K]) -> StoreResult<()>
where
    K: Eq + Hash + Display,
{
    if existing.len() != submitted.len() {
        return Err(StoreError::InvalidPermutation(format!(
            "expected {} ids, got {}",
            existing.len(),
            submitted.len()
        )));
    }

    let known: HashSet<&K> = existing.iter().collect();
    let mut seen = HashSet::with_capacity(submitted.len());
    for id in submitted {
        if !seen.insert(id) {
            return Err(StoreError::InvalidPermutation(format!("duplicate id {}", id)));
        }
        if !known.contains(id) {
            return Err(StoreError::InvalidPermutation(format!("unknown id {}", id)));
        }
    }

    Ok(())
}

fn arrange<T, K, F>(records: Vec<T>, order: &[K], key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut by_key: HashMap<K, T> = records.into_iter().map(|r| (key(&r), r)).collect();
    order.iter().filter_map(|k| by_key.remove(k)).collect()
}

/// Valid legacy blocks with unique ids, first occurrence wins.
fn importable_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut seen = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| match block.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(block_id = %block.id, error = %e, "Skipping invalid legacy block");
                false
            }
        })
        .filter(|block| seen.insert(block.id.clone()))
        .collect()
}
