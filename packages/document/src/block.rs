//! Content blocks.
//!
//! A block is an id plus a [`BlockBody`]. The body is a tagged union whose
//! `type` tag decides the shape of `content` and `styles`, so a body is always
//! replaced as a whole and type and styles can never disagree.
//!
//! Wire form:
//!
//! ```json
//! { "id": "…", "type": "text",  "content": "Hi",            "styles": { "variant": "h1" } }
//! { "id": "…", "type": "image", "content": "https://x.png", "styles": { "width": 640, "height": 480 } }
//! ```

use crate::ids::BlockId;
use crate::validate::{require_id, validate_block, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(flatten)]
    pub body: BlockBody,
}

/// Block payload without identity ("block minus id" on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    Text { content: String, styles: TextStyles },
    Image { content: String, styles: ImageStyles },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyles {
    pub variant: TextVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageStyles {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    H1,
    H2,
    H3,
    Paragraph,
}

/// Discriminant of a [`BlockBody`], used by menus to pick what to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Text,
    Image,
}

impl Block {
    /// Create a block with a freshly minted id.
    pub fn new(body: BlockBody) -> Self {
        Self {
            id: BlockId::new(),
            body,
        }
    }

    pub fn with_id(id: impl Into<BlockId>, body: BlockBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Decode a raw candidate, running the shared validation rules first.
    pub fn from_value(candidate: Value) -> Result<Self, ValidationError> {
        let fields = candidate.as_object().ok_or(ValidationError::NotAnObject)?;
        require_id(fields)?;
        validate_block(&candidate)?;
        serde_json::from_value(candidate).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.body.validate()
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }
}

impl BlockBody {
    pub fn text(content: impl Into<String>, variant: TextVariant) -> Self {
        BlockBody::Text {
            content: content.into(),
            styles: TextStyles { variant },
        }
    }

    pub fn image(url: impl Into<String>, width: f64, height: f64) -> Self {
        BlockBody::Image {
            content: url.into(),
            styles: ImageStyles { width, height },
        }
    }

    /// Decode a raw "block minus id" candidate through the shared rules.
    pub fn from_value(candidate: Value) -> Result<Self, ValidationError> {
        validate_block(&candidate)?;
        serde_json::from_value(candidate).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Re-check a typed body against the shared rules.
    ///
    /// Non-finite dimensions project to JSON `null` and fail the dimension rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let projected =
            serde_json::to_value(self).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        validate_block(&projected)
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Text { .. } => BlockKind::Text,
            BlockBody::Image { .. } => BlockKind::Image,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            BlockBody::Text { content, .. } | BlockBody::Image { content, .. } => content,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Text => f.write_str("text"),
            BlockKind::Image => f.write_str("image"),
        }
    }
}
