//! Render snapshot fingerprints.
//!
//! A render is a pure function of (source, output size, adjustments), so a
//! snapshot whose fingerprint matches the one on the live surface would
//! redraw identical pixels. The session compares [`RenderKey`]s and skips
//! such redraws.
//!
//! ## Keys
//!
//! - **source id**: SHA-256 of the uploaded bytes. Content-based, so
//!   re-uploading the same file keeps the key stable while any other file
//!   changes it.
//! - **size**: the committed output size.
//! - **adjustments**: the clamped slider values.

use crate::imaging::{AdjustmentSet, Dimensions};
use image::RgbaImage;
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    hex(&Sha256::digest(bytes))
}

/// SHA-256 over an image's size and raw RGBA samples.
pub fn pixels_hash(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_raw());
    hex(&hasher.finalize())
}

fn hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Everything a render reads.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderKey {
    pub source_id: String,
    pub size: Dimensions,
    pub adjustments: AdjustmentSet,
}

impl RenderKey {
    pub fn new(source_id: &str, size: Dimensions, adjustments: AdjustmentSet) -> Self {
        Self {
            source_id: source_id.to_string(),
            size,
            adjustments,
        }
    }
}
