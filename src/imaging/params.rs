//! Parameter types for rendering.
//!
//! These structs describe *what* the user asked for, not *how* it is drawn.
//! They are the interface between the [`session`](crate::session) (which
//! stores and normalizes user input) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Adjustment`]: One of the seven sliders, with its range and default.
//! - [`AdjustmentSet`]: Current value of every slider. Clamped on write.
//! - [`Dimensions`]: Pixel width and height (natural size, output size).
//! - [`Axis`]: Which resize field an edit targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the seven continuous editing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Blur,
    Warm,
    Cool,
}

impl Adjustment {
    /// All adjustments, in panel order.
    pub const ALL: [Adjustment; 7] = [
        Adjustment::Brightness,
        Adjustment::Contrast,
        Adjustment::Saturation,
        Adjustment::Hue,
        Adjustment::Blur,
        Adjustment::Warm,
        Adjustment::Cool,
    ];

    /// Inclusive `(min, max)` range of the slider.
    pub fn range(self) -> (f64, f64) {
        match self {
            Adjustment::Brightness | Adjustment::Contrast | Adjustment::Saturation => {
                (-100.0, 100.0)
            }
            Adjustment::Hue => (-180.0, 180.0),
            Adjustment::Blur => (0.0, 20.0),
            Adjustment::Warm | Adjustment::Cool => (0.0, 100.0),
        }
    }

    pub fn default_value(self) -> f64 {
        0.0
    }

    pub fn name(self) -> &'static str {
        match self {
            Adjustment::Brightness => "brightness",
            Adjustment::Contrast => "contrast",
            Adjustment::Saturation => "saturation",
            Adjustment::Hue => "hue",
            Adjustment::Blur => "blur",
            Adjustment::Warm => "warm",
            Adjustment::Cool => "cool",
        }
    }

    /// Clamp a raw value into this adjustment's range.
    ///
    /// NaN carries no usable value, so it falls back to the default.
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown adjustment '{0}' (expected one of brightness, contrast, saturation, hue, blur, warm, cool)")]
pub struct UnknownAdjustment(pub String);

impl FromStr for Adjustment {
    type Err = UnknownAdjustment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Adjustment::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAdjustment(s.to_string()))
    }
}

/// Current value of every slider.
///
/// Fields are private so every write goes through [`AdjustmentSet::set`],
/// which keeps each value inside its declared range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AdjustmentSet {
    brightness: f64,
    contrast: f64,
    saturation: f64,
    hue: f64,
    blur: f64,
    warm: f64,
    cool: f64,
}

impl AdjustmentSet {
    pub fn get(&self, kind: Adjustment) -> f64 {
        match kind {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturation => self.saturation,
            Adjustment::Hue => self.hue,
            Adjustment::Blur => self.blur,
            Adjustment::Warm => self.warm,
            Adjustment::Cool => self.cool,
        }
    }

    /// Store a clamped value and return what was stored.
    pub fn set(&mut self, kind: Adjustment, value: f64) -> f64 {
        let value = kind.clamp(value);
        let slot = match kind {
            Adjustment::Brightness => &mut self.brightness,
            Adjustment::Contrast => &mut self.contrast,
            Adjustment::Saturation => &mut self.saturation,
            Adjustment::Hue => &mut self.hue,
            Adjustment::Blur => &mut self.blur,
            Adjustment::Warm => &mut self.warm,
            Adjustment::Cool => &mut self.cool,
        };
        *slot = value;
        value
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, kind: Adjustment, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Build dimensions, raising either side to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    pub fn with(self, axis: Axis, value: u32) -> Self {
        match axis {
            Axis::Width => Self::new(value, self.height),
            Axis::Height => Self::new(self.width, value),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A resize field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}
