//! Background plate preparation
//!
//! The background must cover the foreground frame completely before a
//! window is cut out of it, so smaller plates are enlarged to cover and
//! larger ones are used as-is.

use image::{imageops, RgbImage};

use crate::error::{MattingError, Result};

use super::resize::{resize_rgb, ResizeFilter};

/// Enlarge a background until it covers `fg_w` x `fg_h`
///
/// The scale is the larger of the two axis ratios, dimensions round up,
/// and a plate already covering the frame is returned unchanged.
pub fn scale_to_cover(bg: &RgbImage, fg_w: u32, fg_h: u32) -> Result<RgbImage> {
    let (bw, bh) = bg.dimensions();
    if bw == 0 || bh == 0 || fg_w == 0 || fg_h == 0 {
        return Err(MattingError::degenerate(format!(
            "cannot fit background {bw}x{bh} to frame {fg_w}x{fg_h}"
        )));
    }
    let ratio_w = f64::from(fg_w) / f64::from(bw);
    let ratio_h = f64::from(fg_h) / f64::from(bh);
    let ratio = ratio_w.max(ratio_h);
    if ratio <= 1.0 {
        return Ok(bg.clone());
    }
    let new_w = ((f64::from(bw) * ratio).ceil() as u32).max(fg_w);
    let new_h = ((f64::from(bh) * ratio).ceil() as u32).max(fg_h);
    Ok(resize_rgb(bg, new_w, new_h, ResizeFilter::Linear))
}

/// Copy a `w` x `h` window out of the background at the given offset
pub fn crop_window(bg: &RgbImage, x: u32, y: u32, w: u32, h: u32) -> Result<RgbImage> {
    let (bw, bh) = bg.dimensions();
    if u64::from(x) + u64::from(w) > u64::from(bw) || u64::from(y) + u64::from(h) > u64::from(bh) {
        return Err(MattingError::degenerate(format!(
            "window {w}x{h}+{x}+{y} exceeds background {bw}x{bh}"
        )));
    }
    Ok(imageops::crop_imm(bg, x, y, w, h).to_image())
}
