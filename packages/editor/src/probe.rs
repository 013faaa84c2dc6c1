//! Image dimension probing.
//!
//! Image blocks store explicit pixel dimensions, so an image URL has to be
//! resolved to a width and height before the block can exist.

use async_trait::async_trait;
use image::ImageReader;
use reqwest::Client;
use std::io::Cursor;
use thiserror::Error;

/// Largest image body the probe will download.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("failed to fetch image: {0}")]
    Fetch(String),

    #[error("unsupported or corrupt image: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn dimensions(&self, url: &str) -> Result<ImageDimensions, ProbeError>;
}

/// Downloads the image and reads the size from its header.
#[derive(Debug, Clone, Default)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn dimensions(&self, url: &str) -> Result<ImageDimensions, ProbeError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProbeError::Fetch(e.to_string()))?;
        if let Some(declared) = response.content_length() {
            check_size(usize::try_from(declared).unwrap_or(usize::MAX))?;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProbeError::Fetch(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
            check_size(bytes.len())?;
        }

        let dimensions = decode_dimensions(&bytes)?;
        tracing::debug!(url, width = dimensions.width, height = dimensions.height, "Probed image");
        Ok(dimensions)
    }
}

fn check_size(len: usize) -> Result<(), ProbeError> {
    if len > MAX_IMAGE_BYTES {
        return Err(ProbeError::Fetch(format!(
            "image exceeds {} bytes",
            MAX_IMAGE_BYTES
        )));
    }
    Ok(())
}

pub fn decode_dimensions(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(ProbeError::Decode("image has no pixels".to_string()));
    }
    Ok(ImageDimensions { width, height })
}

/// Reports the same dimensions for every URL. For offline use.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub ImageDimensions);

#[async_trait]
impl ImageProbe for FixedProbe {
    async fn dimensions(&self, _url: &str) -> Result<ImageDimensions, ProbeError> {
        Ok(self.0)
    }
}
