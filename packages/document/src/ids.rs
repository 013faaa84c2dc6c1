//! Client-generated identifiers.
//!
//! Ids are opaque strings on the wire. New ids are random UUID v4 values so
//! that rapid creation never collides; ids read back from storage are accepted
//! as-is, including older timestamp-style ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a page, unique within the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

/// Identifier of a block, unique within its page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl PageId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl BlockId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for PageId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for BlockId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for BlockId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<BlockId> = (0..1000).map(|_| BlockId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = PageId::from("page-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"page-1\"");

        let back: PageId = serde_json::from_str("\"page-1\"").unwrap();
        assert_eq!(back, id);
    }
}
