//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Stretch** | `imageops::resize` (configurable filter) |
//! | **Color filters** | sRGB color matrices, `rayon` row-parallel |
//! | **Blur** | separable gaussian, premultiplied, `rayon` row-parallel |
//! | **Encode** | PNG via `image::codecs::png` |
//!
//! The module is split into:
//! - **Parameters**: slider values, sizes, and their normalization
//! - **Calculations**: pure color and dimension math (unit testable)
//! - **Filters**: the ordered [`FilterPipeline`] built from the sliders
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Surface**: the canvas a render draws into

pub mod backend;
mod calculations;
pub mod filters;
mod params;
pub mod rust_backend;
pub mod surface;

pub use backend::{BackendError, ImageBackend, SourceImage};
pub use calculations::normalize_dimension;
pub use filters::{ColorOp, Filter, FilterPipeline};
pub use params::{Adjustment, AdjustmentSet, Axis, Dimensions, UnknownAdjustment};
pub use rust_backend::{Resample, RustBackend};
pub use surface::Surface;
