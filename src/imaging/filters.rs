//! The composed filter pipeline.
//!
//! A [`FilterPipeline`] is an ordered list of [`Filter`] stages in drawing
//! units (percent, degrees, pixels). It is built from an
//! [`AdjustmentSet`] in a fixed order:
//!
//! ```text
//! brightness → contrast → saturate → hue-rotate → sepia → invert → blur
//! ```
//!
//! Every stage is nonlinear once clamping is taken into account, so the
//! order is part of the output contract. The pipeline renders to a CSS-style
//! descriptor string for display:
//!
//! ```text
//! brightness(100%) contrast(100%) saturate(100%) hue-rotate(0deg) sepia(0%) invert(0%) blur(0px)
//! ```

use super::calculations::{self, ColorMatrix};
use super::params::{Adjustment, AdjustmentSet};
use serde::Serialize;
use std::fmt;

/// A single pipeline stage in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Filter {
    /// Percent, 100 = unchanged.
    Brightness(f64),
    /// Percent, 100 = unchanged.
    Contrast(f64),
    /// Percent, 100 = unchanged.
    Saturate(f64),
    /// Degrees.
    HueRotate(f64),
    /// Percent mix, 0 = unchanged.
    Sepia(f64),
    /// Percent mix, 0 = unchanged.
    Invert(f64),
    /// Gaussian standard deviation in pixels, 0 = unchanged.
    Blur(f64),
}

impl Filter {
    /// Whether this stage leaves every pixel untouched.
    pub fn is_identity(&self) -> bool {
        match *self {
            Filter::Brightness(v) | Filter::Contrast(v) | Filter::Saturate(v) => v == 100.0,
            Filter::HueRotate(deg) => deg % 360.0 == 0.0,
            Filter::Sepia(v) | Filter::Invert(v) | Filter::Blur(v) => v <= 0.0,
        }
    }

    /// Precomputed per-pixel operation for a color stage.
    ///
    /// Returns `None` for blur, which is spatial rather than per-pixel.
    pub fn color_op(&self) -> Option<ColorOp> {
        let op = match *self {
            Filter::Brightness(p) => ColorOp::Scale(p as f32 / 100.0),
            Filter::Contrast(p) => ColorOp::Contrast(p as f32 / 100.0),
            Filter::Saturate(p) => ColorOp::Matrix(calculations::saturate_matrix(p as f32 / 100.0)),
            Filter::HueRotate(deg) => ColorOp::Matrix(calculations::hue_rotate_matrix(deg as f32)),
            Filter::Sepia(p) => ColorOp::Matrix(calculations::sepia_matrix(p as f32 / 100.0)),
            Filter::Invert(p) => ColorOp::Invert(p as f32 / 100.0),
            Filter::Blur(_) => return None,
        };
        Some(op)
    }
}

/// A color stage ready to run on pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOp {
    Scale(f32),
    Contrast(f32),
    Matrix(ColorMatrix),
    Invert(f32),
}

impl ColorOp {
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            ColorOp::Scale(factor) => calculations::brightness(*factor, rgb),
            ColorOp::Contrast(factor) => calculations::contrast(*factor, rgb),
            ColorOp::Matrix(m) => calculations::apply_matrix(m, rgb),
            ColorOp::Invert(amount) => calculations::invert(*amount, rgb),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Brightness(v) => write!(f, "brightness({v}%)"),
            Filter::Contrast(v) => write!(f, "contrast({v}%)"),
            Filter::Saturate(v) => write!(f, "saturate({v}%)"),
            Filter::HueRotate(v) => write!(f, "hue-rotate({v}deg)"),
            Filter::Sepia(v) => write!(f, "sepia({v}%)"),
            Filter::Invert(v) => write!(f, "invert({v}%)"),
            Filter::Blur(v) => write!(f, "blur({v}px)"),
        }
    }
}

/// Ordered list of filter stages applied during a draw.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FilterPipeline {
    stages: Vec<Filter>,
}

impl FilterPipeline {
    /// Build a pipeline from explicit stages, kept in the given order.
    pub fn new(stages: Vec<Filter>) -> Self {
        Self { stages }
    }

    /// Compose the canonical pipeline for a set of slider values.
    pub fn from_adjustments(adjustments: &AdjustmentSet) -> Self {
        let offset = |kind| adjustments.get(kind) + 100.0;
        Self::new(vec![
            Filter::Brightness(offset(Adjustment::Brightness)),
            Filter::Contrast(offset(Adjustment::Contrast)),
            Filter::Saturate(offset(Adjustment::Saturation)),
            Filter::HueRotate(adjustments.get(Adjustment::Hue)),
            Filter::Sepia(adjustments.get(Adjustment::Warm)),
            Filter::Invert(adjustments.get(Adjustment::Cool)),
            Filter::Blur(adjustments.get(Adjustment::Blur).max(0.0)),
        ])
    }

    pub fn stages(&self) -> &[Filter] {
        &self.stages
    }

    pub fn is_identity(&self) -> bool {
        self.stages.iter().all(Filter::is_identity)
    }

    /// Stages that actually change pixels, in pipeline order.
    pub fn active_stages(&self) -> impl Iterator<Item = &Filter> {
        self.stages.iter().filter(|f| !f.is_identity())
    }
}

impl fmt::Display for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

impl From<&AdjustmentSet> for FilterPipeline {
    fn from(adjustments: &AdjustmentSet) -> Self {
        Self::from_adjustments(adjustments)
    }
}
