//! Aspect-preserving letterbox onto a square canvas
//!
//! Validation skips random cropping, so oblong frames are scaled until
//! the long edge matches the target and centered on a zero canvas. The
//! composite, trimap and alpha travel together to stay aligned.

use image::{GrayImage, RgbImage};

use crate::error::{MattingError, Result};

use super::resize::{resize_gray, resize_rgb, ResizeFilter};

/// A composite with its trimap and alpha after letterboxing
#[derive(Debug, Clone)]
pub struct Letterboxed {
    pub image: RgbImage,
    pub trimap: GrayImage,
    pub alpha: GrayImage,
}

/// Scale to fit the square and center on black
///
/// The long edge lands exactly on `size`; the short edge scales in
/// integer proportion and is padded evenly, extra pixel trailing. The
/// padded trimap region reads as certain background.
pub fn letterbox_to_square(
    image: &RgbImage,
    trimap: &GrayImage,
    alpha: &GrayImage,
    size: u32,
) -> Result<Letterboxed> {
    let dims = image.dimensions();
    if trimap.dimensions() != dims || alpha.dimensions() != dims {
        return Err(MattingError::degenerate(format!(
            "letterbox inputs disagree: image {:?}, trimap {:?}, alpha {:?}",
            dims,
            trimap.dimensions(),
            alpha.dimensions()
        )));
    }
    let (w, h) = dims;
    if w == 0 || h == 0 || size == 0 {
        return Err(MattingError::degenerate(format!(
            "cannot letterbox {w}x{h} onto {size}x{size}"
        )));
    }

    let (new_w, new_h, x_off, y_off) = if h > w {
        let new_w = ((u64::from(w) * u64::from(size) / u64::from(h)) as u32).max(1);
        (new_w, size, (size - new_w) / 2, 0)
    } else {
        let new_h = ((u64::from(h) * u64::from(size) / u64::from(w)) as u32).max(1);
        (size, new_h, 0, (size - new_h) / 2)
    };

    let image = resize_rgb(image, new_w, new_h, ResizeFilter::Area);
    let trimap = resize_gray(trimap, new_w, new_h, ResizeFilter::Area);
    let alpha = resize_gray(alpha, new_w, new_h, ResizeFilter::Area);

    Ok(Letterboxed {
        image: pad_rgb(&image, size, x_off, y_off),
        trimap: pad_gray(&trimap, size, x_off, y_off),
        alpha: pad_gray(&alpha, size, x_off, y_off),
    })
}

fn pad_rgb(src: &RgbImage, size: u32, x_off: u32, y_off: u32) -> RgbImage {
    let mut canvas = RgbImage::new(size, size);
    for (x, y, px) in src.enumerate_pixels() {
        canvas.put_pixel(x + x_off, y + y_off, *px);
    }
    canvas
}

fn pad_gray(src: &GrayImage, size: u32, x_off: u32, y_off: u32) -> GrayImage {
    let mut canvas = GrayImage::new(size, size);
    for (x, y, px) in src.enumerate_pixels() {
        canvas.put_pixel(x + x_off, y + y_off, *px);
    }
    canvas
}
