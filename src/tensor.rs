//! Tensor packing and photometric jitter
//!
//! The synthesized images leave the pipeline as channel-first `f32`
//! arrays ready for a training loop: a display tensor scaled to unit
//! range, a normalized four-channel input and a two-channel target.

use image::{GrayImage, RgbImage};
use ndarray::Array3;
use rand::Rng;

use crate::error::{MattingError, Result};

/// Multiplicative photometric jitter factors
///
/// Each factor is drawn around `1.0`; applying all three at `1.0`
/// leaves the image untouched. Applied in brightness, contrast,
/// saturation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorJitterFactors {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl ColorJitterFactors {
    /// Factors that leave the image unchanged
    pub const IDENTITY: Self = Self {
        brightness: 1.0,
        contrast: 1.0,
        saturation: 1.0,
    };

    /// Draw factors uniformly from `[max(0, 1 - strength), 1 + strength)`
    pub fn draw(strength: f32, rng: &mut impl Rng) -> Self {
        if strength <= 0.0 {
            return Self::IDENTITY;
        }
        let lo = (1.0 - strength).max(0.0);
        let hi = 1.0 + strength;
        Self {
            brightness: rng.random_range(lo..hi),
            contrast: rng.random_range(lo..hi),
            saturation: rng.random_range(lo..hi),
        }
    }
}

fn gray_level(px: [f32; 3]) -> f32 {
    0.299 * px[0] + 0.587 * px[1] + 0.114 * px[2]
}

fn apply_jitter(planes: &mut [[f32; 3]], factors: ColorJitterFactors) {
    for px in planes.iter_mut() {
        for v in px.iter_mut() {
            *v = (*v * factors.brightness).clamp(0.0, 1.0);
        }
    }

    // Contrast pivots on the mean luminance of the current image
    let mean = planes.iter().map(|px| gray_level(*px)).sum::<f32>() / planes.len().max(1) as f32;
    for px in planes.iter_mut() {
        for v in px.iter_mut() {
            *v = (factors.contrast * *v + (1.0 - factors.contrast) * mean).clamp(0.0, 1.0);
        }
    }

    for px in planes.iter_mut() {
        let gray = gray_level(*px);
        for v in px.iter_mut() {
            *v = (factors.saturation * *v + (1.0 - factors.saturation) * gray).clamp(0.0, 1.0);
        }
    }
}

fn unit_planes(image: &RgbImage) -> Vec<[f32; 3]> {
    image
        .pixels()
        .map(|px| {
            [
                f32::from(px[0]) / 255.0,
                f32::from(px[1]) / 255.0,
                f32::from(px[2]) / 255.0,
            ]
        })
        .collect()
}

/// Composite as a `(3, H, W)` tensor in unit range, no normalization
#[must_use]
pub fn pack_display(image: &RgbImage) -> Array3<f32> {
    let (w, h) = image.dimensions();
    let mut out = Array3::zeros((3, h as usize, w as usize));
    for (x, y, px) in image.enumerate_pixels() {
        for c in 0..3 {
            out[[c, y as usize, x as usize]] = f32::from(px[c]) / 255.0;
        }
    }
    out
}

/// Model input as a `(4, H, W)` tensor
///
/// Color channels are optionally jittered, then normalized per channel.
/// The fourth channel carries the trimap scaled to unit range, exempt
/// from both jitter and normalization.
pub fn pack_input(
    image: &RgbImage,
    trimap: &GrayImage,
    jitter: Option<ColorJitterFactors>,
    mean: [f32; 3],
    std: [f32; 3],
) -> Result<Array3<f32>> {
    let (w, h) = image.dimensions();
    if trimap.dimensions() != (w, h) {
        return Err(MattingError::degenerate(format!(
            "input tensor inputs disagree: image {:?}, trimap {:?}",
            (w, h),
            trimap.dimensions()
        )));
    }

    let mut planes = unit_planes(image);
    if let Some(factors) = jitter {
        apply_jitter(&mut planes, factors);
    }

    let (w, h) = (w as usize, h as usize);
    let mut out = Array3::zeros((4, h, w));
    for y in 0..h {
        for x in 0..w {
            let px = planes[y * w + x];
            for c in 0..3 {
                out[[c, y, x]] = (px[c] - mean[c]) / std[c];
            }
        }
    }
    for (x, y, px) in trimap.enumerate_pixels() {
        out[[3, y as usize, x as usize]] = f32::from(px[0]) / 255.0;
    }
    Ok(out)
}

/// Supervision target as a `(2, H, W)` tensor
///
/// Channel 0 holds the alpha in unit range; channel 1 classifies each
/// pixel as background `0.0`, unknown `1.0` or foreground `2.0` from
/// the exact alpha value.
#[must_use]
pub fn pack_target(alpha: &GrayImage) -> Array3<f32> {
    let (w, h) = alpha.dimensions();
    let mut out = Array3::zeros((2, h as usize, w as usize));
    for (x, y, px) in alpha.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        out[[0, y, x]] = f32::from(px[0]) / 255.0;
        out[[1, y, x]] = match px[0] {
            0 => 0.0,
            255 => 2.0,
            _ => 1.0,
        };
    }
    out
}
