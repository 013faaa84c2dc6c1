//! # Block Validation
//!
//! Shape checks for block and page candidates.
//!
//! Candidates are raw JSON so that values a typed model cannot even express
//! (a width given as `"600"`, a missing `styles` object) are rejected with a
//! precise reason. The editor runs these rules before applying a change
//! locally and the storage boundary runs them again before writing.
//!
//! ## Block rules (checked in order, first failure wins)
//!
//! 1. `type` is `"text"` or `"image"`
//! 2. `content` is a string; image content is a non-empty `http://` / `https://` URL
//! 3. `styles` is an object (not `null`, not an array)
//! 4. text: `styles.variant` is one of `h1`, `h2`, `h3`, `paragraph`
//! 5. image: `styles.width` and `styles.height` are finite numbers greater than zero

use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Allowed values of `styles.variant` on text blocks.
pub const TEXT_VARIANTS: [&str; 4] = ["h1", "h2", "h3", "paragraph"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Block type must be \"text\" or \"image\"")]
    InvalidType,

    #[error("Block content must be a string")]
    ContentNotString,

    #[error("Image content must be an http:// or https:// URL")]
    InvalidImageUrl,

    #[error("Block styles must be an object")]
    StylesNotObject,

    #[error("Text variant must be one of h1, h2, h3, paragraph")]
    InvalidVariant,

    #[error("Image {0} must be a finite number greater than zero")]
    InvalidDimension(&'static str),

    #[error("Id must be a non-empty string")]
    MissingId,

    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Page blocks must be an array")]
    BlocksNotArray,

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(String),

    #[error("Block {index} is invalid: {reason}")]
    InvalidBlock {
        index: usize,
        reason: Box<ValidationError>,
    },

    #[error("Malformed value: {0}")]
    Malformed(String),
}

/// Validate a block candidate (with or without an `id` field).
pub fn validate_block(candidate: &Value) -> Result<(), ValidationError> {
    let fields = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    let kind = match fields.get("type").and_then(Value::as_str) {
        Some(kind @ ("text" | "image")) => kind,
        _ => return Err(ValidationError::InvalidType),
    };

    let content = fields
        .get("content")
        .and_then(Value::as_str)
        .ok_or(ValidationError::ContentNotString)?;

    if kind == "image" && !is_http_url(content) {
        return Err(ValidationError::InvalidImageUrl);
    }

    let styles = fields
        .get("styles")
        .and_then(Value::as_object)
        .ok_or(ValidationError::StylesNotObject)?;

    match kind {
        "text" => {
            let variant = styles.get("variant").and_then(Value::as_str);
            if !variant.is_some_and(|v| TEXT_VARIANTS.contains(&v)) {
                return Err(ValidationError::InvalidVariant);
            }
        }
        _ => {
            check_dimension(styles, "width")?;
            check_dimension(styles, "height")?;
        }
    }

    Ok(())
}

/// Validate a full page candidate: id, title, and every embedded block.
pub fn validate_page(candidate: &Value) -> Result<(), ValidationError> {
    let fields = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    require_id(fields)?;

    let title = fields.get("title").and_then(Value::as_str).unwrap_or("");
    normalize_title(title)?;

    let blocks = fields
        .get("blocks")
        .and_then(Value::as_array)
        .ok_or(ValidationError::BlocksNotArray)?;

    let mut seen = HashSet::new();
    for (index, block) in blocks.iter().enumerate() {
        let wrap = |reason| ValidationError::InvalidBlock {
            index,
            reason: Box::new(reason),
        };

        let block_fields = block.as_object().ok_or_else(|| wrap(ValidationError::NotAnObject))?;
        let id = require_id(block_fields).map_err(wrap)?;
        validate_block(block).map_err(wrap)?;

        if !seen.insert(id) {
            return Err(ValidationError::DuplicateBlockId(id.to_string()));
        }
    }

    Ok(())
}

/// Trim a page title, rejecting titles that are empty afterwards.
pub fn normalize_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn require_id(fields: &Map<String, Value>) -> Result<&str, ValidationError> {
    match fields.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ValidationError::MissingId),
    }
}

fn is_http_url(content: &str) -> bool {
    content.starts_with("http://") || content.starts_with("https://")
}

fn check_dimension(styles: &Map<String, Value>, name: &'static str) -> Result<(), ValidationError> {
    match styles.get(name).and_then(Value::as_f64) {
        Some(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(ValidationError::InvalidDimension(name)),
    }
}
