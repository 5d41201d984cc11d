//! Trimap synthesis and morphological coarsening
//!
//! The ground-truth trimap is an exact relabeling of the alpha mask. The
//! input trimap widens its unknown band by eroding and dilating with an
//! elliptical structuring element, keeping a pixel certain only where the
//! whole neighborhood agrees.

use image::{GrayImage, Luma};

/// Trimap value for certain background
pub const TRIMAP_BACKGROUND: u8 = 0;
/// Trimap value for the unknown band
pub const TRIMAP_UNKNOWN: u8 = 128;
/// Trimap value for certain foreground
pub const TRIMAP_FOREGROUND: u8 = 255;

/// Three-value trimap from exact alpha values
///
/// Only fully transparent and fully opaque pixels count as certain;
/// every other raw value lands in the unknown band. No thresholds.
#[must_use]
pub fn ground_truth_trimap(alpha: &GrayImage) -> GrayImage {
    let (w, h) = alpha.dimensions();
    let mut out = GrayImage::from_pixel(w, h, Luma([TRIMAP_UNKNOWN]));
    for (x, y, px) in alpha.enumerate_pixels() {
        match px[0] {
            0 => out.put_pixel(x, y, Luma([TRIMAP_BACKGROUND])),
            255 => out.put_pixel(x, y, Luma([TRIMAP_FOREGROUND])),
            _ => {}
        }
    }
    out
}

/// Offsets of an elliptical structuring element relative to its anchor
///
/// Classic raster ellipse fill: half-axes `size / 2`, per-row horizontal
/// span from the ellipse equation, anchored at the kernel center. The
/// anchor offset `(0, 0)` is always part of the element.
#[must_use]
pub fn ellipse_kernel(size: u32) -> Vec<(i32, i32)> {
    let size = size as i32;
    let r = size / 2;
    let c = size / 2;
    let inv_r2 = if r > 0 { 1.0 / f64::from(r * r) } else { 0.0 };
    let mut offsets = Vec::new();
    for i in 0..size {
        let dy = i - r;
        if dy.abs() > r {
            continue;
        }
        let dx = (f64::from(c) * (f64::from(r * r - dy * dy) * inv_r2).sqrt()).round() as i32;
        let j1 = (c - dx).max(0);
        let j2 = (c + dx + 1).min(size);
        for j in j1..j2 {
            offsets.push((j - c, dy));
        }
    }
    offsets
}

/// Grayscale erosion: minimum over the kernel footprint
///
/// Out-of-frame samples are ignored, so the border never darkens a pixel
/// on its own.
#[must_use]
pub fn erode(image: &GrayImage, kernel: &[(i32, i32)]) -> GrayImage {
    morph(image, kernel, true)
}

/// Grayscale dilation: maximum over the kernel footprint
///
/// Out-of-frame samples are ignored, mirroring the erosion border rule.
#[must_use]
pub fn dilate(image: &GrayImage, kernel: &[(i32, i32)]) -> GrayImage {
    morph(image, kernel, false)
}

fn morph(image: &GrayImage, kernel: &[(i32, i32)], take_min: bool) -> GrayImage {
    let (w, h) = image.dimensions();
    let (neutral, saturated) = if take_min {
        (u8::MAX, u8::MIN)
    } else {
        (u8::MIN, u8::MAX)
    };
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut best = neutral;
            for &(ox, oy) in kernel {
                let sx = i64::from(x) + i64::from(ox);
                let sy = i64::from(y) + i64::from(oy);
                if sx < 0 || sy < 0 || sx >= i64::from(w) || sy >= i64::from(h) {
                    continue;
                }
                let v = image.get_pixel(sx as u32, sy as u32)[0];
                best = if take_min { best.min(v) } else { best.max(v) };
                if best == saturated {
                    break;
                }
            }
            out.put_pixel(x, y, Luma([best]));
        }
    }
    out
}

/// Coarsened input trimap from the ground truth
///
/// Foreground survives only where erosion keeps it saturated, background
/// only where dilation cannot reach it; everything else widens into the
/// unknown band.
#[must_use]
pub fn coarse_trimap(gt: &GrayImage, kernel_size: u32) -> GrayImage {
    let kernel = ellipse_kernel(kernel_size);
    let eroded = erode(gt, &kernel);
    let dilated = dilate(gt, &kernel);
    let (w, h) = gt.dimensions();
    let mut out = GrayImage::from_pixel(w, h, Luma([TRIMAP_UNKNOWN]));
    for y in 0..h {
        for x in 0..w {
            if eroded.get_pixel(x, y)[0] == TRIMAP_FOREGROUND {
                out.put_pixel(x, y, Luma([TRIMAP_FOREGROUND]));
            } else if dilated.get_pixel(x, y)[0] == TRIMAP_BACKGROUND {
                out.put_pixel(x, y, Luma([TRIMAP_BACKGROUND]));
            }
        }
    }
    out
}
