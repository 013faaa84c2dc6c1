use crate::block::Block;
use crate::ids::{BlockId, PageId};
use crate::validate::{normalize_title, validate_page, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title given to the page synthesized from a legacy flat block collection.
pub const IMPORTED_PAGE_TITLE: &str = "Imported Page";

/// A named, ordered container of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page with a freshly minted id.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: PageId::new(),
            title: normalize_title(title)?,
            blocks: Vec::new(),
        })
    }

    /// Decode a raw candidate, running page and block validation first.
    pub fn from_value(candidate: Value) -> Result<Self, ValidationError> {
        validate_page(&candidate)?;
        serde_json::from_value(candidate).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let projected =
            serde_json::to_value(self).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        validate_page(&projected)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Same page with its block list replaced.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            blocks,
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            title: title.into(),
            blocks: self.blocks.clone(),
        }
    }
}
