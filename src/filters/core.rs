//! Convolution engine shared by the kernel-based filters.
//!
//! Windows that reach past the image edge read the nearest valid row/column
//! (edge replication). Output is computed from a snapshot of the input, so the
//! per-pixel work is order independent and runs in parallel with rayon.

use ndarray::{Array2, Zip};

use crate::color::{Kernel, Pixel};
use crate::image::Image;

/// Sharpening kernel: identity plus a negated 4-neighbour Laplacian.
pub const SHARPEN_KERNEL: Kernel<3> = Kernel::new([
    [0.0, -1.0, 0.0],
    [-1.0, 5.0, -1.0],
    [0.0, -1.0, 0.0],
]);

/// 4-neighbour Laplacian used for edge detection.
pub const EDGE_KERNEL: Kernel<3> = Kernel::new([
    [0.0, -1.0, 0.0],
    [-1.0, 4.0, -1.0],
    [0.0, -1.0, 0.0],
]);

/// Convolve `image` with `kernel` over a `(2 * radius + 1)` square window.
///
/// Each output channel is the weighted sum of the clamped neighbourhood,
/// then clamped into 0.0-1.0. `radius` must match the kernel size.
///
/// # Returns
/// New `(height, width)` array; `image` is left untouched.
pub fn apply_kernel<const N: usize>(image: &Image, kernel: &Kernel<N>, radius: usize) -> Array2<Pixel> {
    debug_assert_eq!(2 * radius + 1, kernel.size(), "kernel radius mismatch");

    let mut output = Array2::<Pixel>::default((image.height(), image.width()));
    if image.is_empty() {
        return output;
    }

    let r = radius as isize;
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        let mut sum = Pixel::BLACK;
        for dy in -r..=r {
            for dx in -r..=r {
                let weight = kernel.weight((dy + r) as usize, (dx + r) as usize);
                let src = image.clamped(y as isize + dy, x as isize + dx);
                sum = sum + src * weight;
            }
        }
        *out = sum.clamped();
    });

    output
}

/// Convolve in place: the result replaces the image's logical region.
pub fn convolve<const N: usize>(image: &mut Image, kernel: &Kernel<N>) {
    let output = apply_kernel(image, kernel, kernel.radius());
    image.assign(&output);
}
