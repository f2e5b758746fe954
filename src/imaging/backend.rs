//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the editor needs
//! from a raster library: decode uploaded bytes, draw a source into a target
//! size with a filter pipeline, and encode the result as PNG.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock so session logic can be exercised
//! without touching pixels.

use super::filters::FilterPipeline;
use super::params::Dimensions;
use crate::fingerprint;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// A decoded upload.
///
/// Immutable once built: a new upload replaces the whole value. The `id` is
/// a content hash used to fingerprint render snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
    id: String,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage, id: String) -> Self {
        Self { pixels, id }
    }

    /// Wrap already-decoded pixels, hashing them for the id.
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        let id = fingerprint::pixels_hash(&pixels);
        Self { pixels, id }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Intrinsic size of the upload.
    pub fn natural_size(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Trait for raster backends.
pub trait ImageBackend {
    /// Decode uploaded bytes into RGBA pixels plus natural size.
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Stretch `source` to exactly `size` and apply `pipeline` to the result.
    fn draw(
        &self,
        source: &SourceImage,
        size: Dimensions,
        pipeline: &FilterPipeline,
    ) -> Result<RgbaImage, BackendError>;

    /// Encode pixels as PNG.
    fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError>;
}

impl<B: ImageBackend + ?Sized> ImageBackend for &B {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        (**self).decode(bytes)
    }

    fn draw(
        &self,
        source: &SourceImage,
        size: Dimensions,
        pipeline: &FilterPipeline,
    ) -> Result<RgbaImage, BackendError> {
        (**self).draw(source, size, pipeline)
    }

    fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        (**self).encode_png(image)
    }
}
