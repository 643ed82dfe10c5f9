//! Thresholded Laplacian edge detection.
//!
//! The image is converted to grayscale, convolved with the 4-neighbour
//! Laplacian, and every pixel whose response exceeds the threshold becomes
//! white; the rest become black.

use crate::color::Pixel;
use crate::error::{Error, Result};
use crate::image::Image;

use super::core::{convolve, EDGE_KERNEL};
use super::grayscale::grayscale;
use super::parse_arg;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetection {
    pub threshold: f64,
}

impl EdgeDetection {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(Error::argument("edge threshold must be finite"));
        }
        Ok(Self { threshold })
    }

    pub fn from_args(args: &[&str]) -> Result<Self> {
        match args {
            [threshold] => Self::new(parse_arg(threshold, "threshold")?),
            _ => Err(Error::argument("edge detection takes a threshold")),
        }
    }

    pub fn apply(&self, image: &mut Image) {
        grayscale(image);
        convolve(image, &EDGE_KERNEL);

        let threshold = self.threshold;
        // channels are equal after grayscale, red stands for all three
        image.view_mut().par_map_inplace(|px| {
            *px = if px.red > threshold {
                Pixel::WHITE
            } else {
                Pixel::BLACK
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_gray_is_black() {
        let mut img = Image::filled(4, 3, Pixel::gray(0.5));
        EdgeDetection::new(0.5).unwrap().apply(&mut img);
        assert!(img.view().iter().all(|&px| px == Pixel::BLACK));
    }

    #[test]
    fn test_bright_dot_is_detected() {
        let mut img = Image::new(5, 5);
        img.set(2, 2, Pixel::WHITE);
        EdgeDetection::new(0.1).unwrap().apply(&mut img);

        assert_eq!(img.get(2, 2), Some(Pixel::WHITE));
        // neighbours get a negative response, clamped to 0
        assert_eq!(img.get(2, 3), Some(Pixel::BLACK));
        assert_eq!(img.get(0, 0), Some(Pixel::BLACK));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut img = Image::new(3, 3);
        img.set(1, 1, Pixel::gray(0.25));
        // center response is about 4 * 0.25 and clamping caps it at 1.0
        EdgeDetection::new(1.0).unwrap().apply(&mut img);
        assert_eq!(img.get(1, 1), Some(Pixel::BLACK));
    }

    #[test]
    fn test_args() {
        assert_eq!(EdgeDetection::from_args(&["0.3"]).unwrap().threshold, 0.3);
        assert!(matches!(EdgeDetection::from_args(&["abc"]), Err(Error::Argument(_))));
        assert!(matches!(EdgeDetection::from_args(&["NaN"]), Err(Error::Argument(_))));
        assert!(matches!(EdgeDetection::from_args(&[]), Err(Error::Argument(_))));
    }
}
