//! Separable Gaussian blur.
//!
//! Two passes (vertical, then horizontal) over a half-open window
//! `[center - delta, center + delta)` with `delta = round(3 * sigma)`. Each
//! sample is divided by `exp(offset^2 / (2 * sigma^2))`; the accumulated sum
//! is divided once, at the end of the second pass, by `2 * pi * sigma^2`.
//! The weights are not renormalized per pixel, so brightness is not exactly
//! preserved near borders or for very small sigmas.

use std::f64::consts::PI;

use ndarray::{Array2, Zip};

use crate::color::Pixel;
use crate::error::{Error, Result};
use crate::image::{clamp_index, Image};

use super::parse_arg;

/// Window half-width in units of sigma.
const SIGMA_SPAN: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    pub sigma: f64,
}

impl GaussianBlur {
    pub fn new(sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::argument("blur sigma must be a positive number"));
        }
        if (SIGMA_SPAN * sigma).round() > f64::from(i32::MAX) {
            return Err(Error::argument(format!("blur sigma {sigma} is too large")));
        }
        Ok(Self { sigma })
    }

    pub fn from_args(args: &[&str]) -> Result<Self> {
        match args {
            [sigma] => Self::new(parse_arg(sigma, "sigma")?),
            _ => Err(Error::argument("gaussian blur takes a sigma")),
        }
    }

    /// Window half-width in pixels; fits in `i32` for any accepted sigma.
    pub fn delta(&self) -> isize {
        (SIGMA_SPAN * self.sigma).round() as isize
    }

    /// Divisor for the sample at `offset` from the center.
    #[inline]
    fn falloff(offset: isize, two_sigma_sq: f64) -> f64 {
        let k = offset as f64;
        (k * k / two_sigma_sq).exp()
    }

    pub fn apply(&self, image: &mut Image) {
        if image.is_empty() {
            return;
        }

        let (height, width) = (image.height(), image.width());
        let delta = self.delta();
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;
        let norm = PI * 2.0 * self.sigma * self.sigma;

        // Vertical pass
        let mut temp = Array2::<Pixel>::default((height, width));
        {
            let source = &*image;
            Zip::indexed(&mut temp).par_for_each(|(y, x), out| {
                let mut sum = Pixel::BLACK;
                for offset in -delta..delta {
                    let f = Self::falloff(offset, two_sigma_sq);
                    let px = source.clamped((y as isize).saturating_add(offset), x as isize);
                    sum = sum + px.map(|c| c / f);
                }
                *out = sum;
            });
        }

        // Horizontal pass
        let mut result = Array2::<Pixel>::default((height, width));
        Zip::indexed(&mut result).par_for_each(|(y, x), out| {
            let mut sum = Pixel::BLACK;
            for offset in -delta..delta {
                let f = Self::falloff(offset, two_sigma_sq);
                let sx = clamp_index((x as isize).saturating_add(offset), width);
                sum = sum + temp[[y, sx]].map(|c| c / f);
            }
            *out = sum.map(|c| c / norm);
        });

        image.assign(&result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_rounds_three_sigma() {
        assert_eq!(GaussianBlur::new(1.0).unwrap().delta(), 3);
        assert_eq!(GaussianBlur::new(0.5).unwrap().delta(), 2); // 1.5 rounds up
        assert_eq!(GaussianBlur::new(0.1).unwrap().delta(), 0);
    }

    #[test]
    fn test_single_pixel_matches_closed_form() {
        let mut img = Image::filled(1, 1, Pixel::WHITE);
        GaussianBlur::new(1.0).unwrap().apply(&mut img);

        // every tap clamps onto the same pixel; window is offsets -3..=2
        let s: f64 = (-3i32..3)
            .map(|k| 1.0 / ((k * k) as f64 / 2.0).exp())
            .sum();
        let expected = s * s / (2.0 * PI);
        let px = img.get(0, 0).unwrap();
        assert!((px.red - expected).abs() < 1e-9, "got {}", px.red);
        assert!((px.blue - expected).abs() < 1e-9);
        // not a normalized kernel: slightly below the input
        assert!(px.red < 1.0 && px.red > 0.98);
    }

    #[test]
    fn test_tiny_sigma_gives_black() {
        let mut img = Image::filled(3, 3, Pixel::WHITE);
        GaussianBlur::new(0.1).unwrap().apply(&mut img);
        assert!(img.view().iter().all(|&px| px == Pixel::BLACK));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let mut img = Image::filled(6, 5, Pixel::gray(0.5));
        GaussianBlur::new(0.7).unwrap().apply(&mut img);
        let first = img.get(0, 0).unwrap();
        for &px in img.view().iter() {
            assert!((px.red - first.red).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spreads_energy_to_neighbours() {
        let mut img = Image::new(7, 7);
        img.set(3, 3, Pixel::WHITE);
        GaussianBlur::new(1.0).unwrap().apply(&mut img);

        let center = img.get(3, 3).unwrap().red;
        let near = img.get(3, 4).unwrap().red;
        let far = img.get(3, 6).unwrap().red;
        assert!(center > near && near > far && far > 0.0);
        // window is half-open: offset +3 is never sampled, offset -3 is
        assert_eq!(img.get(0, 3).unwrap().red, 0.0);
    }

    #[test]
    fn test_args() {
        assert!(matches!(GaussianBlur::from_args(&["0"]), Err(Error::Argument(_))));
        assert!(matches!(GaussianBlur::from_args(&["-2"]), Err(Error::Argument(_))));
        assert!(matches!(GaussianBlur::from_args(&["wide"]), Err(Error::Argument(_))));
        assert_eq!(GaussianBlur::from_args(&["2.5"]).unwrap().sigma, 2.5);
    }

    #[test]
    fn test_window_must_fit_i32() {
        assert!(matches!(GaussianBlur::from_args(&["1e300"]), Err(Error::Argument(_))));
        assert!(matches!(GaussianBlur::new(1e9), Err(Error::Argument(_))));
        // 3 * 7e8 = 2.1e9 is still below i32::MAX
        let blur = GaussianBlur::new(7e8).unwrap();
        assert_eq!(blur.delta(), 2_100_000_000);
    }
}
