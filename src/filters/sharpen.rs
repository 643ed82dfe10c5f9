//! Sharpening via a 3x3 Laplacian-boost kernel.

use crate::image::Image;

use super::core::{convolve, SHARPEN_KERNEL};

pub fn sharpen(image: &mut Image) {
    convolve(image, &SHARPEN_KERNEL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Pixel;

    #[test]
    fn test_flat_image_unchanged() {
        let mut img = Image::filled(4, 4, Pixel::new(0.5, 0.25, 0.125));
        sharpen(&mut img);
        let px = img.get(2, 1).unwrap();
        assert!((px.red - 0.5).abs() < 1e-12);
        assert!((px.green - 0.25).abs() < 1e-12);
        assert!((px.blue - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_boosts_local_contrast() {
        let mut img = Image::filled(3, 3, Pixel::gray(0.4));
        img.set(1, 1, Pixel::gray(0.5));
        sharpen(&mut img);
        // 5 * 0.5 - 4 * 0.4 = 0.9
        assert!((img.get(1, 1).unwrap().red - 0.9).abs() < 1e-9);
        // 5 * 0.4 - 3 * 0.4 - 0.5 = 0.3
        assert!((img.get(0, 1).unwrap().red - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_two_by_two_corners() {
        let mut img = Image::from_rows(vec![
            vec![Pixel::WHITE, Pixel::BLACK],
            vec![Pixel::BLACK, Pixel::BLACK],
        ])
        .unwrap();
        sharpen(&mut img);
        // white corner: 5 - (2 clamped self reads) = 3 -> clamped to 1
        assert_eq!(img.get(0, 0), Some(Pixel::WHITE));
        // its neighbours: -1 contribution -> clamped to 0
        assert_eq!(img.get(0, 1), Some(Pixel::BLACK));
        assert_eq!(img.get(1, 1), Some(Pixel::BLACK));
    }
}
