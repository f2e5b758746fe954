//! Pure Rust raster backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, WebP, BMP, GIF) | `image::load_from_memory` |
//! | Stretch to output size | `image::imageops::resize` with the configured [`Resample`] filter |
//! | Color stages | per-pixel [`ColorOp`]s, row-parallel via `rayon` |
//! | Blur | separable gaussian (sigma = radius) on premultiplied RGBA, row-parallel via `rayon` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Consecutive color stages are fused into one pass over the pixels, kept
//! in `f32` between stages and rounded to 8 bits once at the end of the
//! run. A blur stage always sees 8-bit input.
//!
//! Blur treats everything outside the surface as transparent black, the way
//! a 2D canvas filter does, so a blurred image fades to transparent at its
//! borders. Sampling happens on premultiplied values so transparent
//! neighbours never darken the color.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::calculations::{self, quantize};
use super::filters::{ColorOp, Filter, FilterPipeline};
use super::params::Dimensions;
use crate::fingerprint;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Resampling filter used when the output size differs from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resample {
    Nearest,
    /// Bilinear.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl Resample {
    pub fn filter_type(self) -> FilterType {
        match self {
            Resample::Nearest => FilterType::Nearest,
            Resample::Triangle => FilterType::Triangle,
            Resample::CatmullRom => FilterType::CatmullRom,
            Resample::Gaussian => FilterType::Gaussian,
            Resample::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Raster backend built on the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    resample: Resample,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resample(resample: Resample) -> Self {
        Self { resample }
    }
}

/// Stretch the source to `size`; an exact-size draw copies the pixels.
fn stretch(source: &RgbaImage, size: Dimensions, resample: Resample) -> RgbaImage {
    if source.dimensions() == (size.width, size.height) {
        return source.clone();
    }
    imageops::resize(source, size.width, size.height, resample.filter_type())
}

/// Run a fused sequence of color stages over every pixel. Alpha is kept.
fn apply_color_ops(image: &mut RgbaImage, ops: &[ColorOp]) {
    if ops.is_empty() {
        return;
    }
    let row_len = image.width() as usize * 4;
    let samples: &mut [u8] = image;
    samples.par_chunks_mut(row_len).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let mut rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
            for op in ops {
                rgb = op.apply(rgb);
            }
            px[0] = quantize(rgb[0]);
            px[1] = quantize(rgb[1]);
            px[2] = quantize(rgb[2]);
        }
    });
}

/// Weighted sum of `fetch(i)` for the taps of `kernel` centered on `center`.
/// Taps outside `0..len` contribute zero.
fn convolve(
    kernel: &[f32],
    center: usize,
    len: usize,
    fetch: impl Fn(usize) -> [f32; 4],
) -> [f32; 4] {
    let radius = kernel.len() / 2;
    let first = center.saturating_sub(radius);
    let last = (center + radius).min(len - 1);
    let mut acc = [0.0f32; 4];
    for i in first..=last {
        let w = kernel[i + radius - center];
        let px = fetch(i);
        for c in 0..4 {
            acc[c] += px[c] * w;
        }
    }
    acc
}

/// Gaussian blur with transparent-black padding.
fn gaussian_blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    let kernel = calculations::gaussian_kernel(sigma);
    let (width, height) = (image.width() as usize, image.height() as usize);
    let premultiplied: Vec<[f32; 4]> = image
        .pixels()
        .map(|p| calculations::premultiply(p.0))
        .collect();

    let mut horizontal = vec![[0.0f32; 4]; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &premultiplied[y * width..(y + 1) * width];
            for (x, out) in row.iter_mut().enumerate() {
                *out = convolve(&kernel, x, width, |i| line[i]);
            }
        });

    let mut out = RgbaImage::new(image.width(), image.height());
    let samples: &mut [u8] = &mut out;
    samples
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let acc = convolve(&kernel, y, height, |i| horizontal[i * width + x]);
                px.copy_from_slice(&calculations::unpremultiply(acc));
            }
        });
    out
}

/// Apply every non-identity stage of `pipeline` in order.
pub(crate) fn apply_pipeline(mut image: RgbaImage, pipeline: &FilterPipeline) -> RgbaImage {
    let mut pending: Vec<ColorOp> = Vec::new();
    for stage in pipeline.active_stages() {
        match (stage, stage.color_op()) {
            (_, Some(op)) => pending.push(op),
            (Filter::Blur(radius), None) => {
                apply_color_ops(&mut image, &pending);
                pending.clear();
                image = gaussian_blur(&image, *radius as f32);
            }
            (_, None) => {}
        }
    }
    apply_color_ops(&mut image, &pending);
    image
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SourceImage::new(
            decoded.to_rgba8(),
            fingerprint::content_hash(bytes),
        ))
    }

    fn draw(
        &self,
        source: &SourceImage,
        size: Dimensions,
        pipeline: &FilterPipeline,
    ) -> Result<RgbaImage, BackendError> {
        let stretched = stretch(source.pixels(), size, self.resample);
        Ok(apply_pipeline(stretched, pipeline))
    }

    fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Adjustment, AdjustmentSet};
    use crate::test_helpers::{gradient_image, jpeg_bytes, png_bytes};

    fn pipeline(set: AdjustmentSet) -> FilterPipeline {
        FilterPipeline::from_adjustments(&set)
    }

    #[test]
    fn decode_png_reports_natural_size() {
        let bytes = png_bytes(&gradient_image(40, 30));
        let source = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(source.natural_size(), Dimensions::new(40, 30));
        assert_eq!(source.id(), fingerprint::content_hash(&bytes));
    }

    #[test]
    fn decode_jpeg_is_opaque_rgba() {
        let source = RustBackend::new()
            .decode(&jpeg_bytes(&gradient_image(16, 9)))
            .unwrap();
        assert_eq!(source.natural_size(), Dimensions::new(16, 9));
        assert!(source.pixels().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn decode_garbage_errors() {
        let result = RustBackend::new().decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_empty_errors() {
        assert!(RustBackend::new().decode(&[]).is_err());
    }

    #[test]
    fn draw_has_exact_target_size() {
        let source = SourceImage::from_pixels(gradient_image(40, 30));
        let out = RustBackend::new()
            .draw(
                &source,
                Dimensions::new(17, 90),
                &pipeline(AdjustmentSet::default()),
            )
            .unwrap();
        assert_eq!(out.dimensions(), (17, 90));
    }

    #[test]
    fn default_pipeline_is_pure_resample() {
        let pixels = gradient_image(40, 30);
        let source = SourceImage::from_pixels(pixels.clone());
        let backend = RustBackend::new();

        let same = backend
            .draw(&source, Dimensions::new(40, 30), &FilterPipeline::default())
            .unwrap();
        assert_eq!(same, pixels);

        let scaled = backend
            .draw(
                &source,
                Dimensions::new(20, 15),
                &pipeline(AdjustmentSet::default()),
            )
            .unwrap();
        assert_eq!(scaled, imageops::resize(&pixels, 20, 15, FilterType::Triangle));
    }

    #[test]
    fn zero_brightness_is_black_with_alpha_kept() {
        let source = SourceImage::from_pixels(RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([200, 100, 50, 128]),
        ));
        let out = RustBackend::new()
            .draw(
                &source,
                Dimensions::new(4, 4),
                &pipeline(AdjustmentSet::default().with(Adjustment::Brightness, -100.0)),
            )
            .unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 128]));
    }

    #[test]
    fn full_cool_inverts() {
        let source = SourceImage::from_pixels(RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([10, 20, 30, 255]),
        ));
        let out = RustBackend::new()
            .draw(
                &source,
                Dimensions::new(2, 2),
                &pipeline(AdjustmentSet::default().with(Adjustment::Cool, 100.0)),
            )
            .unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [245, 235, 225, 255]);
    }

    #[test]
    fn blur_smooths_a_hard_edge() {
        let pixels = RgbaImage::from_fn(20, 1, |x, _| {
            if x < 10 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let source = SourceImage::from_pixels(pixels);
        let out = RustBackend::new()
            .draw(
                &source,
                Dimensions::new(20, 1),
                &pipeline(AdjustmentSet::default().with(Adjustment::Blur, 2.0)),
            )
            .unwrap();
        let left = out.get_pixel(9, 0).0[0];
        let right = out.get_pixel(10, 0).0[0];
        assert!(left > 0 && right < 255, "edge not blurred: {left} {right}");
    }

    #[test]
    fn sub_pixel_blur_leaves_image_intact() {
        let pixels = gradient_image(40, 30);
        let source = SourceImage::from_pixels(pixels.clone());
        for radius in [0.01, 0.05] {
            let out = RustBackend::new()
                .draw(
                    &source,
                    Dimensions::new(40, 30),
                    &pipeline(AdjustmentSet::default().with(Adjustment::Blur, radius)),
                )
                .unwrap();
            for (a, b) in out.pixels().zip(pixels.pixels()) {
                assert_eq!(a.0[3], 255, "radius {radius}");
                for c in 0..3 {
                    assert!(a.0[c].abs_diff(b.0[c]) <= 1, "radius {radius}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn blur_fades_alpha_at_borders() {
        let source = SourceImage::from_pixels(RgbaImage::from_pixel(
            30,
            30,
            image::Rgba([200, 100, 50, 255]),
        ));
        let out = RustBackend::new()
            .draw(
                &source,
                Dimensions::new(30, 30),
                &pipeline(AdjustmentSet::default().with(Adjustment::Blur, 20.0)),
            )
            .unwrap();
        let corner = out.get_pixel(0, 0).0;
        let center = out.get_pixel(15, 15).0;
        assert!(corner[3] < 200, "corner alpha {}", corner[3]);
        assert!(center[3] > corner[3]);
        // Premultiplied sampling keeps the color itself.
        assert!(corner[0].abs_diff(200) <= 2 && corner[1].abs_diff(100) <= 2);
    }

    #[test]
    fn every_filter_renders_at_degenerate_sizes() {
        let source = SourceImage::from_pixels(gradient_image(40, 30));
        let mut set = AdjustmentSet::default();
        for kind in Adjustment::ALL {
            set.set(kind, 37.0);
        }
        let unblurred = set.with(Adjustment::Blur, 0.0);
        let backend = RustBackend::new();
        for size in [
            Dimensions::new(1, 1),
            Dimensions::new(1, 9),
            Dimensions::new(9, 1),
            Dimensions::new(2, 2),
        ] {
            let out = backend.draw(&source, size, &pipeline(set)).unwrap();
            assert_eq!(out.dimensions(), (size.width, size.height));

            let out = backend.draw(&source, size, &pipeline(unblurred)).unwrap();
            assert_eq!(out.dimensions(), (size.width, size.height));
            assert!(out.pixels().all(|p| p.0[3] == 255), "{size}");
        }
    }

    #[test]
    fn stage_order_changes_pixels() {
        let source = SourceImage::from_pixels(gradient_image(24, 24));
        let backend = RustBackend::new();
        let size = Dimensions::new(24, 24);

        let canonical = FilterPipeline::new(vec![
            Filter::HueRotate(180.0),
            Filter::Sepia(50.0),
            Filter::Blur(5.0),
        ]);
        let swapped = FilterPipeline::new(vec![
            Filter::Sepia(50.0),
            Filter::HueRotate(180.0),
            Filter::Blur(5.0),
        ]);

        let a = backend.draw(&source, size, &canonical).unwrap();
        let b = backend.draw(&source, size, &swapped).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn encode_png_roundtrips_dimensions() {
        let backend = RustBackend::new();
        let bytes = backend.encode_png(&gradient_image(12, 7)).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn resample_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            r: Resample,
        }
        let w: Wrapper = toml::from_str("r = \"catmull-rom\"").unwrap();
        assert_eq!(w.r, Resample::CatmullRom);
        assert_eq!(Resample::default(), Resample::Triangle);
    }
}
