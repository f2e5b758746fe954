//! The drawing surface a render writes into.
//!
//! Mirrors a 2D canvas: allocate at a pixel size, set the filter used by
//! subsequent draws, clear, and draw an image stretched to the full surface.
//! Drawing onto a cleared surface replaces its pixels outright.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::filters::FilterPipeline;
use super::params::Dimensions;
use image::RgbaImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixels: RgbaImage,
    filter: FilterPipeline,
}

impl Surface {
    /// Allocate a transparent surface of exactly `size`.
    pub fn allocate(size: Dimensions) -> Self {
        Self {
            pixels: RgbaImage::new(size.width, size.height),
            filter: FilterPipeline::default(),
        }
    }

    /// Set the pipeline applied by later [`draw_image`](Self::draw_image) calls.
    pub fn set_filter(&mut self, filter: FilterPipeline) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &FilterPipeline {
        &self.filter
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Draw `source` stretched over the whole surface with the current filter.
    pub fn draw_image(
        &mut self,
        backend: &impl ImageBackend,
        source: &SourceImage,
    ) -> Result<(), BackendError> {
        let drawn = backend.draw(source, self.size(), &self.filter)?;
        if drawn.dimensions() != self.pixels.dimensions() {
            return Err(BackendError::ProcessingFailed(format!(
                "backend drew {}x{} onto a {} surface",
                drawn.width(),
                drawn.height(),
                self.size()
            )));
        }
        self.pixels = drawn;
        Ok(())
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
