//! Geometric augmentation of the foreground/alpha pair
//!
//! The foreground and its alpha mask always move together: one scale
//! factor, one rotation angle, one flip decision for both. The background
//! is flipped separately by the pipeline with its own coin.

use crate::ops::resize::{filter_for_scale, resize_gray, resize_rgb, scaled_dimensions};
use image::imageops;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Rescale the pair by a uniform factor
///
/// Factors at or below 1.0 use area averaging, larger factors bilinear.
/// A factor of exactly 1.0 is an identity copy.
#[must_use]
pub fn rescale_pair(fg: &RgbImage, alpha: &GrayImage, factor: f32) -> (RgbImage, GrayImage) {
    let filter = filter_for_scale(factor);
    let (fw, fh) = fg.dimensions();
    let (new_fw, new_fh) = scaled_dimensions(fw, fh, factor);
    let (aw, ah) = alpha.dimensions();
    let (new_aw, new_ah) = scaled_dimensions(aw, ah, factor);
    if (new_fw, new_fh) == (fw, fh) && (new_aw, new_ah) == (aw, ah) {
        return (fg.clone(), alpha.clone());
    }
    (
        resize_rgb(fg, new_fw, new_fh, filter),
        resize_gray(alpha, new_aw, new_ah, filter),
    )
}

/// Rotate the pair about the image center
///
/// Both images get the same angle with bilinear sampling; pixels swung in
/// from outside the frame are zero-filled, which reads as background in
/// the alpha mask.
#[must_use]
pub fn rotate_pair(fg: &RgbImage, alpha: &GrayImage, degrees: i32) -> (RgbImage, GrayImage) {
    let theta = (degrees as f32).to_radians();
    (
        rotate_about_center(fg, theta, Interpolation::Bilinear, Rgb([0, 0, 0])),
        rotate_about_center(alpha, theta, Interpolation::Bilinear, Luma([0])),
    )
}

/// Flip the pair horizontally
#[must_use]
pub fn flip_pair(fg: &RgbImage, alpha: &GrayImage) -> (RgbImage, GrayImage) {
    (
        imageops::flip_horizontal(fg),
        imageops::flip_horizontal(alpha),
    )
}
