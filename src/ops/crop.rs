//! Square cropping centered on the unknown band
//!
//! Crops are anchored on a randomly chosen unknown trimap pixel so the
//! training window always contains matting boundary. The window may hang
//! over the right or bottom frame edge; overflow is zero padded before
//! the final resize.

use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::Rng;

use super::resize::{resize_gray, resize_rgb, ResizeFilter};
use super::trimap::TRIMAP_UNKNOWN;

/// Coordinates of every unknown pixel in a trimap
#[must_use]
pub fn unknown_pixels(trimap: &GrayImage) -> Vec<(u32, u32)> {
    trimap
        .enumerate_pixels()
        .filter(|(_, _, px)| px[0] == TRIMAP_UNKNOWN)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Top-left corner of a crop window centered on a random unknown pixel
///
/// The corner is clamped to the frame at the top and left; the window is
/// allowed to overflow at the right and bottom. A trimap without unknown
/// pixels anchors the crop at the origin.
pub fn random_crop_origin(trimap: &GrayImage, side: u32, rng: &mut impl Rng) -> (u32, u32) {
    let unknowns = unknown_pixels(trimap);
    if unknowns.is_empty() {
        return (0, 0);
    }
    let (cx, cy) = unknowns[rng.random_range(0..unknowns.len())];
    let half = side / 2;
    (cx.saturating_sub(half), cy.saturating_sub(half))
}

/// Square window copied out of an image, zero padded past the frame
#[must_use]
pub fn extract_square_rgb(src: &RgbImage, x: u32, y: u32, side: u32) -> RgbImage {
    let mut out = RgbImage::from_pixel(side, side, Rgb([0, 0, 0]));
    let copy_w = src.width().saturating_sub(x).min(side);
    let copy_h = src.height().saturating_sub(y).min(side);
    for dy in 0..copy_h {
        for dx in 0..copy_w {
            out.put_pixel(dx, dy, *src.get_pixel(x + dx, y + dy));
        }
    }
    out
}

/// Square window copied out of a grayscale image, zero padded past the frame
#[must_use]
pub fn extract_square_gray(src: &GrayImage, x: u32, y: u32, side: u32) -> GrayImage {
    let mut out = GrayImage::from_pixel(side, side, Luma([0]));
    let copy_w = src.width().saturating_sub(x).min(side);
    let copy_h = src.height().saturating_sub(y).min(side);
    for dy in 0..copy_h {
        for dx in 0..copy_w {
            out.put_pixel(dx, dy, *src.get_pixel(x + dx, y + dy));
        }
    }
    out
}

/// Crop a square window and bring it to the target edge length
pub fn crop_to_size_rgb(src: &RgbImage, x: u32, y: u32, side: u32, target: u32) -> RgbImage {
    let window = extract_square_rgb(src, x, y, side);
    if side == target {
        window
    } else {
        resize_rgb(&window, target, target, ResizeFilter::Area)
    }
}

/// Grayscale variant of [`crop_to_size_rgb`]
pub fn crop_to_size_gray(src: &GrayImage, x: u32, y: u32, side: u32, target: u32) -> GrayImage {
    let window = extract_square_gray(src, x, y, side);
    if side == target {
        window
    } else {
        resize_gray(&window, target, target, ResizeFilter::Area)
    }
}
