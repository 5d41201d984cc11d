//! Alpha compositing of foreground over background

use image::{GrayImage, Rgb, RgbImage};

use crate::error::{MattingError, Result};

/// Blend foreground over background through an alpha mask
///
/// All three images must share dimensions. Channels blend in linear
/// `a * fg + (1 - a) * bg` form with `a` in `[0, 1]`; the result is
/// truncated back to `u8`.
pub fn composite(fg: &RgbImage, bg: &RgbImage, alpha: &GrayImage) -> Result<RgbImage> {
    let dims = fg.dimensions();
    if bg.dimensions() != dims || alpha.dimensions() != dims {
        return Err(MattingError::degenerate(format!(
            "composite inputs disagree: fg {:?}, bg {:?}, alpha {:?}",
            dims,
            bg.dimensions(),
            alpha.dimensions()
        )));
    }
    let (w, h) = dims;
    let mut out = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = f32::from(alpha.get_pixel(x, y)[0]) / 255.0;
            let f = fg.get_pixel(x, y);
            let b = bg.get_pixel(x, y);
            let mut blended = [0u8; 3];
            for c in 0..3 {
                let v = a * f32::from(f[c]) + (1.0 - a) * f32::from(b[c]);
                blended[c] = v as u8;
            }
            out.put_pixel(x, y, Rgb(blended));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_opaque_alpha_keeps_foreground() {
        let fg = RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]));
        let bg = RgbImage::from_pixel(3, 3, Rgb([200, 210, 220]));
        let alpha = GrayImage::from_pixel(3, 3, Luma([255]));
        let out = composite(&fg, &bg, &alpha).unwrap();
        assert_eq!(out.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_transparent_alpha_keeps_background() {
        let fg = RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]));
        let bg = RgbImage::from_pixel(3, 3, Rgb([200, 210, 220]));
        let alpha = GrayImage::from_pixel(3, 3, Luma([0]));
        let out = composite(&fg, &bg, &alpha).unwrap();
        assert_eq!(out.get_pixel(0, 2), &Rgb([200, 210, 220]));
    }

    #[test]
    fn test_half_alpha_blends_toward_background() {
        let fg = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));
        let bg = RgbImage::from_pixel(1, 1, Rgb([200, 200, 200]));
        let alpha = GrayImage::from_pixel(1, 1, Luma([128]));
        let out = composite(&fg, &bg, &alpha).unwrap();
        // 128/255 * 100 + 127/255 * 200 = 149.8, truncated
        assert_eq!(out.get_pixel(0, 0), &Rgb([149, 149, 149]));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let fg = RgbImage::new(4, 4);
        let bg = RgbImage::new(4, 4);
        let alpha = GrayImage::new(4, 5);
        let err = composite(&fg, &bg, &alpha).unwrap_err();
        assert!(matches!(err, MattingError::DegenerateGeometry(_)));
    }
}
