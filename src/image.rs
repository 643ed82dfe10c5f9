//! In-memory pixel buffer shared by the codec and the filters.
//!
//! The buffer is a dense `(rows, cols)` array of [`Pixel`]s plus a logical
//! width and height. Cropping only shrinks the logical size; the storage keeps
//! its original shape, and every accessor here is limited to the logical
//! region so the stale remainder is never observed.

use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

use crate::color::Pixel;

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: Array2<Pixel>,
    width: usize,
    height: usize,
}

impl Image {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Pixel::BLACK)
    }

    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), pixel),
            width,
            height,
        }
    }

    /// Wrap an existing `(height, width)` array.
    pub fn from_array(pixels: Array2<Pixel>) -> Self {
        let (height, width) = pixels.dim();
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Build an image from rows; all rows must have the same length.
    ///
    /// Returns `None` when the rows are ragged.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<Pixel>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let flat: Vec<Pixel> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((height, width), flat)
            .ok()
            .map(Self::from_array)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read-only view of the logical region.
    pub fn view(&self) -> ArrayView2<'_, Pixel> {
        self.pixels.slice(s![..self.height, ..self.width])
    }

    /// Mutable view of the logical region.
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, Pixel> {
        self.pixels.slice_mut(s![..self.height, ..self.width])
    }

    /// Pixel at `(row, col)`, or `None` outside the logical region.
    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        if row < self.height && col < self.width {
            Some(self.pixels[[row, col]])
        } else {
            None
        }
    }

    /// Overwrite a pixel inside the logical region; out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, pixel: Pixel) {
        if row < self.height && col < self.width {
            self.pixels[[row, col]] = pixel;
        }
    }

    /// Pixel at `(row, col)` with both coordinates pulled to the nearest edge.
    ///
    /// Must not be called on an empty image.
    #[inline]
    pub fn clamped(&self, row: isize, col: isize) -> Pixel {
        self.pixels[[
            clamp_index(row, self.height),
            clamp_index(col, self.width),
        ]]
    }

    /// Shrink the logical size to at most `width` x `height`.
    pub fn crop(&mut self, width: usize, height: usize) {
        self.width = self.width.min(width);
        self.height = self.height.min(height);
    }

    /// Replace the logical region with `region`, which must match its shape.
    pub(crate) fn assign(&mut self, region: &Array2<Pixel>) {
        debug_assert_eq!(region.dim(), (self.height, self.width));
        self.view_mut().assign(region);
    }

    /// Copy of the logical region with compact storage.
    pub fn to_array(&self) -> Array2<Pixel> {
        self.view().to_owned()
    }
}

/// Clamp a signed coordinate into `0..len` (edge replication).
#[inline]
pub fn clamp_index(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}
