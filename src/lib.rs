//! # avnac
//!
//! A single-image adjustment editor. Load one photo, move seven sliders
//! (brightness, contrast, saturation, hue, blur, warm, cool), pick an output
//! size, and export the result as PNG.
//!
//! # Architecture: Parameters In, Pixels Out
//!
//! ```text
//! EditorEvent  →  Session (parameter store)  →  render()  →  Surface  →  export()
//!                   source, sliders, size        pure          live       PNG bytes
//! ```
//!
//! The [`session::Session`] is the only mutable state. Every change to a
//! committed value issues a render request, and [`render::render`] redraws
//! from the immutable source with the whole current snapshot. Nothing is
//! ever re-applied to a previous output, so edits cannot compound.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Parameter store: load, set adjustment, resize, reset, panel flag, render scheduling |
//! | [`render`] | Pure render from source + size + adjustments to a drawn surface |
//! | [`export`] | PNG encoding of the live surface and delivery through a `FileSink` |
//! | [`events`] | Input events and the line-based event script format |
//! | [`imaging`] | Backend trait, filter pipeline and math, surface, `image`-crate backend |
//! | [`fingerprint`] | Source content ids and render snapshot keys |
//! | [`config`] | `avnac.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Filter Order
//!
//! Filters compose in one order: brightness, contrast, saturate, hue-rotate,
//! sepia (warm), invert (cool), blur. The pipeline is a structured list
//! ([`imaging::FilterPipeline`]) with a CSS-like descriptor string for
//! display, so the order is data rather than string concatenation.
//!
//! ## Normalize, Don't Reject
//!
//! Slider values are clamped to their ranges and size fields are normalized
//! to integers of at least 1. Input validation never produces an error.
//!
//! ## Explicit Render Requests
//!
//! There are no observers. Each session operation that changes a committed
//! value calls [`session::Session::request_render`], which skips the draw
//! when the snapshot fingerprint matches the live surface.

pub mod config;
pub mod events;
pub mod export;
pub mod fingerprint;
pub mod imaging;
pub mod output;
pub mod render;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
