//! Color model: normalized RGB pixels and square convolution kernels.
//!
//! Channels are `f64` in the nominal range 0.0-1.0. Filter math is allowed to
//! leave that range temporarily; values are clamped back by the convolution
//! engine and when the codec quantizes to 8-bit.

use std::ops::{Add, Mul};

/// Largest 8-bit channel value, used to normalize bytes into 0.0-1.0.
pub const MAX_COLOR: f64 = u8::MAX as f64;

/// An RGB pixel with normalized channels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pixel {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0.0, 0.0, 0.0);
    pub const WHITE: Pixel = Pixel::new(1.0, 1.0, 1.0);
    pub const RED: Pixel = Pixel::new(1.0, 0.0, 0.0);
    pub const GREEN: Pixel = Pixel::new(0.0, 1.0, 0.0);
    pub const BLUE: Pixel = Pixel::new(0.0, 0.0, 1.0);

    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Same value in all three channels.
    pub const fn gray(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Build a pixel from on-disk byte order (blue, green, red).
    #[inline]
    pub fn from_bgr(bytes: [u8; 3]) -> Self {
        Self::new(
            bytes[2] as f64 / MAX_COLOR,
            bytes[1] as f64 / MAX_COLOR,
            bytes[0] as f64 / MAX_COLOR,
        )
    }

    /// Quantize to on-disk byte order (blue, green, red), clamping first.
    #[inline]
    pub fn to_bgr(self) -> [u8; 3] {
        [
            quantize(self.blue),
            quantize(self.green),
            quantize(self.red),
        ]
    }

    /// Clamp every channel into 0.0-1.0.
    #[inline]
    pub fn clamped(self) -> Self {
        self.map(|c| c.clamp(0.0, 1.0))
    }

    /// Apply `f` to each channel independently.
    #[inline]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.red), f(self.green), f(self.blue))
    }
}

impl Add for Pixel {
    type Output = Pixel;

    fn add(self, rhs: Pixel) -> Pixel {
        Pixel::new(self.red + rhs.red, self.green + rhs.green, self.blue + rhs.blue)
    }
}

impl Mul<f64> for Pixel {
    type Output = Pixel;

    fn mul(self, rhs: f64) -> Pixel {
        self.map(|c| c * rhs)
    }
}

/// Round a normalized channel to the nearest 8-bit value.
#[inline]
pub fn quantize(value: f64) -> u8 {
    (MAX_COLOR * value.clamp(0.0, 1.0)).round() as u8
}

/// Square grid of convolution weights, indexed `[row][col]` around its center.
///
/// `N` is the side length; kernels used by the filters are odd-sized so the
/// center cell sits at `[N / 2][N / 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel<const N: usize> {
    weights: [[f64; N]; N],
}

impl<const N: usize> Kernel<N> {
    pub const fn new(weights: [[f64; N]; N]) -> Self {
        Self { weights }
    }

    /// Half-width of the window this kernel covers (1 for a 3x3 kernel).
    pub const fn radius(&self) -> usize {
        N / 2
    }

    /// Side length of the kernel.
    pub const fn size(&self) -> usize {
        N
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row][col]
    }

    /// Sum of all weights (1.0 for brightness-preserving kernels).
    #[cfg(test)]
    pub(crate) fn sum(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bgr_normalizes_and_reorders() {
        let px = Pixel::from_bgr([0, 51, 255]);
        assert!((px.red - 1.0).abs() < 1e-12);
        assert!((px.green - 0.2).abs() < 1e-12);
        assert_eq!(px.blue, 0.0);
    }

    #[test]
    fn test_to_bgr_clamps_out_of_range() {
        let px = Pixel::new(1.7, -0.3, 0.5);
        // 0.5 * 255 = 127.5 rounds away from zero
        assert_eq!(px.to_bgr(), [128, 0, 255]);
    }

    #[test]
    fn test_byte_roundtrip_is_exact() {
        for v in 0..=255u8 {
            let px = Pixel::from_bgr([v, v, v]);
            assert_eq!(px.to_bgr(), [v, v, v]);
        }
    }

    #[test]
    fn test_kernel_radius_and_sum() {
        let k = Kernel::new([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]);
        assert_eq!(k.radius(), 1);
        assert_eq!(k.size(), 3);
        assert_eq!(k.weight(1, 1), 5.0);
        assert!((k.sum() - 1.0).abs() < 1e-12);
    }
}
