//! Resize filters for the interpolation policy
//!
//! Downscales use pixel-area averaging (OpenCV's decimation behavior),
//! upscales use bilinear interpolation. The `image` crate ships no area
//! filter, so the shrink path is a weighted box average with fractional
//! edge coverage; a resize that enlarges either axis falls back to the
//! bilinear path, which is also what area decimation degenerates to.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Pixel, RgbImage};

/// Interpolation regime for one resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    /// Pixel-area averaging, the downscale regime
    Area,
    /// Bilinear interpolation, the upscale regime
    Linear,
}

/// Filter for a uniform scale factor: area at or below 1.0, linear above
#[must_use]
pub fn filter_for_scale(factor: f32) -> ResizeFilter {
    if factor <= 1.0 {
        ResizeFilter::Area
    } else {
        ResizeFilter::Linear
    }
}

/// Dimensions after scaling by a uniform factor, rounded, floored at 1px
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let w = (f64::from(width) * f64::from(factor)).round().max(1.0) as u32;
    let h = (f64::from(height) * f64::from(factor)).round().max(1.0) as u32;
    (w, h)
}

/// Resize a color image with the given filter
#[must_use]
pub fn resize_rgb(image: &RgbImage, width: u32, height: u32, filter: ResizeFilter) -> RgbImage {
    match filter {
        ResizeFilter::Linear => imageops::resize(image, width, height, FilterType::Triangle),
        ResizeFilter::Area => area_resize(image, width, height),
    }
}

/// Resize a grayscale image with the given filter
#[must_use]
pub fn resize_gray(image: &GrayImage, width: u32, height: u32, filter: ResizeFilter) -> GrayImage {
    match filter {
        ResizeFilter::Linear => imageops::resize(image, width, height, FilterType::Triangle),
        ResizeFilter::Area => area_resize(image, width, height),
    }
}

fn area_resize<P>(src: &ImageBuffer<P, Vec<u8>>, dst_w: u32, dst_h: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (src_w, src_h) = src.dimensions();
    if dst_w > src_w || dst_h > src_h {
        return imageops::resize(src, dst_w, dst_h, FilterType::Triangle);
    }
    if dst_w == src_w && dst_h == src_h {
        return src.clone();
    }

    let scale_x = f64::from(src_w) / f64::from(dst_w);
    let scale_y = f64::from(src_h) / f64::from(dst_h);
    let channels = usize::from(P::CHANNEL_COUNT);
    let mut acc = vec![0f64; channels];
    let mut out: ImageBuffer<P, Vec<u8>> = ImageBuffer::new(dst_w, dst_h);

    for dy in 0..dst_h {
        let y0 = f64::from(dy) * scale_y;
        let y1 = (f64::from(dy) + 1.0) * scale_y;
        let sy_end = (y1.ceil() as u32).min(src_h);
        for dx in 0..dst_w {
            let x0 = f64::from(dx) * scale_x;
            let x1 = (f64::from(dx) + 1.0) * scale_x;
            let sx_end = (x1.ceil() as u32).min(src_w);

            for a in &mut acc {
                *a = 0.0;
            }
            let mut total = 0.0;
            for sy in y0.floor() as u32..sy_end {
                let wy = coverage(f64::from(sy), y0, y1);
                if wy <= 0.0 {
                    continue;
                }
                for sx in x0.floor() as u32..sx_end {
                    let wx = coverage(f64::from(sx), x0, x1);
                    if wx <= 0.0 {
                        continue;
                    }
                    let weight = wx * wy;
                    let pixel = src.get_pixel(sx, sy);
                    for (a, &v) in acc.iter_mut().zip(pixel.channels()) {
                        *a += weight * f64::from(v);
                    }
                    total += weight;
                }
            }

            let pixel = out.get_pixel_mut(dx, dy);
            for (v, a) in pixel.channels_mut().iter_mut().zip(&acc) {
                *v = (a / total).round() as u8;
            }
        }
    }
    out
}

/// Overlap of the unit source cell starting at `cell` with `[lo, hi)`
fn coverage(cell: f64, lo: f64, hi: f64) -> f64 {
    (cell + 1.0).min(hi) - cell.max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_filter_for_scale() {
        assert_eq!(filter_for_scale(0.5), ResizeFilter::Area);
        assert_eq!(filter_for_scale(1.0), ResizeFilter::Area);
        assert_eq!(filter_for_scale(1.01), ResizeFilter::Linear);
        assert_eq!(filter_for_scale(1.5), ResizeFilter::Linear);
    }

    #[test]
    fn test_scaled_dimensions_round_and_floor() {
        assert_eq!(scaled_dimensions(10, 8, 0.75), (8, 6));
        assert_eq!(scaled_dimensions(10, 8, 1.5), (15, 12));
        // Rounded, not truncated
        assert_eq!(scaled_dimensions(3, 3, 0.5), (2, 2));
        // Never collapses to zero
        assert_eq!(scaled_dimensions(2, 2, 0.1), (1, 1));
    }

    #[test]
    fn test_area_downscale_averages_blocks() {
        // 4x4 image of 2x2 blocks with values 0, 255, 255, 0
        let img = GrayImage::from_fn(4, 4, |x, y| {
            if (x < 2) == (y < 2) {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let small = resize_gray(&img, 2, 2, ResizeFilter::Area);
        assert_eq!(small.get_pixel(0, 0)[0], 0);
        assert_eq!(small.get_pixel(1, 0)[0], 255);
        assert_eq!(small.get_pixel(0, 1)[0], 255);
        assert_eq!(small.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn test_area_fractional_coverage() {
        // 3 -> 2 shrink: first output covers [0, 1.5) of the source
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[0u8, 150, 30][x as usize]]));
        let small = resize_gray(&img, 2, 1, ResizeFilter::Area);
        // (0 * 1.0 + 150 * 0.5) / 1.5 = 50
        assert_eq!(small.get_pixel(0, 0)[0], 50);
        // (150 * 0.5 + 30 * 1.0) / 1.5 = 70
        assert_eq!(small.get_pixel(1, 0)[0], 70);
    }

    #[test]
    fn test_area_identity() {
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8, y as u8, 7]));
        let same = resize_rgb(&img, 5, 4, ResizeFilter::Area);
        assert_eq!(same, img);
    }

    #[test]
    fn test_area_enlargement_falls_back_to_linear() {
        let img = RgbImage::from_pixel(4, 4, Rgb([90, 90, 90]));
        let big = resize_rgb(&img, 8, 8, ResizeFilter::Area);
        assert_eq!(big.dimensions(), (8, 8));
        assert_eq!(big.get_pixel(4, 4), &Rgb([90, 90, 90]));
    }

    #[test]
    fn test_linear_resize_dimensions() {
        let img = RgbImage::from_pixel(10, 6, Rgb([1, 2, 3]));
        let out = resize_rgb(&img, 15, 9, ResizeFilter::Linear);
        assert_eq!(out.dimensions(), (15, 9));
    }
}
