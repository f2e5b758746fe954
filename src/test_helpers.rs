//! Shared test utilities for the avnac test suite.
//!
//! Provides synthetic images and encoders so tests never depend on fixture
//! files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = png_bytes(&gradient_image(80, 60));
//! let mut session = Session::new(RustBackend::new(), EditorConfig::default());
//! session.load_image(&bytes);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};

// =========================================================================
// Synthetic images
// =========================================================================

/// An opaque image whose red, green, and blue channels all vary, so color
/// stages and stage order produce visible differences.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
        let g = (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8;
        let b = ((x + y) * 37 % 256) as u8;
        Rgba([r, g, b, 255])
    })
}

// =========================================================================
// Encoders
// =========================================================================

/// Encode as PNG bytes, the way an upload would arrive.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
    out
}

/// Encode as JPEG bytes (RGB, alpha dropped).
pub fn jpeg_bytes(image: &RgbaImage) -> Vec<u8> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_covers_full_red_range() {
        let img = gradient_image(10, 4);
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(9, 0).0[0], 255);
        assert_eq!(img.get_pixel(0, 3).0[1], 255);
    }

    #[test]
    fn encoded_bytes_decode_back() {
        let img = gradient_image(6, 5);
        let png = image::load_from_memory(&png_bytes(&img)).unwrap();
        assert_eq!(png.to_rgba8(), img);
        let jpeg = image::load_from_memory(&jpeg_bytes(&img)).unwrap();
        assert_eq!((jpeg.width(), jpeg.height()), (6, 5));
    }
}
