//! The render engine.
//!
//! [`render`] maps `(source, output size, adjustments)` to a freshly drawn
//! [`Surface`]. It always starts from the immutable source bitmap and never
//! reads a previous output, so repeated edits cannot compound resampling or
//! rounding loss. Calling it twice with the same inputs yields identical
//! pixels.

use crate::imaging::{
    AdjustmentSet, BackendError, Dimensions, FilterPipeline, ImageBackend, SourceImage, Surface,
};

/// Draw `source` at `size` with the pipeline composed from `adjustments`.
///
/// Returns `Ok(None)` without drawing when no source is loaded.
pub fn render(
    backend: &impl ImageBackend,
    source: Option<&SourceImage>,
    size: Dimensions,
    adjustments: &AdjustmentSet,
) -> Result<Option<Surface>, BackendError> {
    let Some(source) = source else {
        log::debug!("render skipped: no source loaded");
        return Ok(None);
    };

    let mut surface = Surface::allocate(size);
    surface.set_filter(FilterPipeline::from_adjustments(adjustments));
    surface.clear();
    surface.draw_image(backend, source)?;

    log::debug!("rendered {} with [{}]", size, surface.filter());
    Ok(Some(surface))
}
