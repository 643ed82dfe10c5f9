//! Grayscale conversion filter.
//!
//! Uses the ITU-R BT.601 luma coefficients. The result is written to all three
//! channels, so a second pass leaves the image unchanged (up to rounding).

use crate::color::Pixel;
use crate::image::Image;

/// ITU-R BT.601 luma coefficients
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Luma of a single pixel.
#[inline]
pub fn luma(px: Pixel) -> f64 {
    LUMA_R * px.red + LUMA_G * px.green + LUMA_B * px.blue
}

/// Replace every pixel with its luma in all channels.
pub fn grayscale(image: &mut Image) {
    image.view_mut().par_map_inplace(|px| {
        *px = Pixel::gray(luma(*px));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::quantize;

    #[test]
    fn test_grayscale_red() {
        let mut img = Image::filled(1, 1, Pixel::RED);
        grayscale(&mut img);

        let px = img.get(0, 0).unwrap();
        assert!((px.red - LUMA_R).abs() < 1e-12);
        assert_eq!(px.red, px.green);
        assert_eq!(px.green, px.blue);
        // 0.299 * 255 = 76.245
        assert_eq!(quantize(px.red), 76);
    }

    #[test]
    fn test_grayscale_white() {
        let mut img = Image::filled(2, 2, Pixel::WHITE);
        grayscale(&mut img);
        // 0.299 + 0.587 + 0.114 = 1.0
        assert!((img.get(1, 0).unwrap().green - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let mut img = Image::filled(2, 1, Pixel::new(0.9, 0.3, 0.1));
        grayscale(&mut img);
        let once = img.clone();
        grayscale(&mut img);

        let (a, b) = (once.get(0, 1).unwrap(), img.get(0, 1).unwrap());
        assert!((a.red - b.red).abs() < 1e-12);
        assert_eq!(quantize(a.red), quantize(b.red));
    }
}
