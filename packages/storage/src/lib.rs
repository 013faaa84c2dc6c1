//! # Blockpad Storage
//!
//! Flat-file persistence behind the Blockpad page service.
//!
//! ```text
//! PageStore ── pages.json   (array of Page, the live document)
//!           └─ blocks.json  (array of Block, legacy flat collection)
//! ```
//!
//! Each file holds the single current state of one resource. Writes replace
//! the whole array; there is no versioning and no cross-process locking, so
//! the last writer wins.

mod collection;
mod errors;
mod store;

pub use collection::{Collection, JsonFileCollection, MemoryCollection};
pub use errors::{StoreError, StoreResult};
pub use store::{PageStore, BLOCKS_FILE, PAGES_FILE};
