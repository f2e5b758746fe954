//! Pure calculation functions for sizes and color math.
//!
//! All functions here are pure and testable without any I/O or images.
//! Channel values are `f32` in `0.0..=255.0` (sRGB, not premultiplied).

/// Normalize raw text from a resize field into a pixel dimension.
///
/// Non-numeric, zero, and non-finite input become 1. Fractions are floored
/// and anything below 1 is raised to 1. Values past `u32::MAX` saturate.
///
/// # Examples
/// ```
/// # use avnac::imaging::normalize_dimension;
/// assert_eq!(normalize_dimension("640"), 640);
/// assert_eq!(normalize_dimension("12.9"), 12);
/// assert_eq!(normalize_dimension("-5"), 1);
/// assert_eq!(normalize_dimension("abc"), 1);
/// ```
pub fn normalize_dimension(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 1.0 => v.floor().min(u32::MAX as f64) as u32,
        _ => 1,
    }
}

/// Row-major 3x3 matrix applied to `[r, g, b]`.
pub type ColorMatrix = [[f32; 3]; 3];

// Luminance weights shared by the saturate and hue-rotate matrices.
const LUM_R: f32 = 0.213;
const LUM_G: f32 = 0.715;
const LUM_B: f32 = 0.072;

/// Saturation matrix for a factor `s` (1.0 = unchanged, 0.0 = grayscale).
pub fn saturate_matrix(s: f32) -> ColorMatrix {
    [
        [LUM_R + 0.787 * s, LUM_G - LUM_G * s, LUM_B - LUM_B * s],
        [LUM_R - LUM_R * s, LUM_G + 0.285 * s, LUM_B - LUM_B * s],
        [LUM_R - LUM_R * s, LUM_G - LUM_G * s, LUM_B + 0.928 * s],
    ]
}

/// Hue rotation matrix for an angle in degrees.
pub fn hue_rotate_matrix(degrees: f32) -> ColorMatrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            LUM_R + cos * 0.787 - sin * LUM_R,
            LUM_G - cos * LUM_G - sin * LUM_G,
            LUM_B - cos * LUM_B + sin * 0.928,
        ],
        [
            LUM_R - cos * LUM_R + sin * 0.143,
            LUM_G + cos * 0.285 + sin * 0.140,
            LUM_B - cos * LUM_B - sin * 0.283,
        ],
        [
            LUM_R - cos * LUM_R - sin * 0.787,
            LUM_G - cos * LUM_G + sin * LUM_G,
            LUM_B + cos * 0.928 + sin * LUM_B,
        ],
    ]
}

/// Sepia matrix for an amount in `[0, 1]` (0 = unchanged).
pub fn sepia_matrix(amount: f32) -> ColorMatrix {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}

pub fn apply_matrix(m: &ColorMatrix, rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        clamp_channel(m[0][0] * r + m[0][1] * g + m[0][2] * b),
        clamp_channel(m[1][0] * r + m[1][1] * g + m[1][2] * b),
        clamp_channel(m[2][0] * r + m[2][1] * g + m[2][2] * b),
    ]
}

/// Multiply every channel by `factor` (1.0 = unchanged).
pub fn brightness(factor: f32, rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| clamp_channel(c * factor))
}

/// Scale every channel away from mid-gray by `factor` (1.0 = unchanged).
pub fn contrast(factor: f32, rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| clamp_channel((c - 127.5) * factor + 127.5))
}

/// Mix toward the inverted color by `amount` in `[0, 1]`.
pub fn invert(amount: f32, rgb: [f32; 3]) -> [f32; 3] {
    let a = amount.clamp(0.0, 1.0);
    rgb.map(|c| clamp_channel(255.0 * a + c * (1.0 - 2.0 * a)))
}

/// Normalized 1D gaussian weights covering ±3 sigma (at least one tap each side).
///
/// Sub-pixel sigmas collapse to a single unit weight at the center, so a
/// tiny blur leaves pixels untouched.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|d| (-((d * d) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Straight RGBA to premultiplied `f32` (color scaled by alpha / 255).
pub fn premultiply(px: [u8; 4]) -> [f32; 4] {
    let a = px[3] as f32;
    let k = a / 255.0;
    [px[0] as f32 * k, px[1] as f32 * k, px[2] as f32 * k, a]
}

/// Premultiplied `f32` back to straight 8-bit RGBA. Zero alpha is transparent black.
pub fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let alpha = quantize(px[3]);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let k = 255.0 / px[3];
    [
        quantize(px[0] * k),
        quantize(px[1] * k),
        quantize(px[2] * k),
        alpha,
    ]
}

#[inline]
pub fn clamp_channel(c: f32) -> f32 {
    c.clamp(0.0, 255.0)
}

#[inline]
pub fn quantize(c: f32) -> u8 {
    clamp_channel(c).round() as u8
}
