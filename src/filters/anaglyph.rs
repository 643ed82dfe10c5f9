//! Stereo anaglyph effect.
//!
//! Red is pushed `step = floor(offset * width)` columns to the right and blue
//! the same distance to the left, each shifted sample weighted by
//! [`SHIFT_GAIN`] and blended with the pixel already there. Samples whose
//! target falls outside the row are replaced by an unweighted copy of the
//! source at the mirrored column `width - j - 1`, added onto that same column.
//! Green is left untouched.

use ndarray::Zip;

use crate::error::{Error, Result};
use crate::image::Image;

use super::parse_arg;

/// Weight of a shifted channel sample relative to the pixel it lands on.
pub const SHIFT_GAIN: f64 = 2.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anaglyph {
    pub offset: f64,
}

impl Anaglyph {
    pub fn new(offset: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(Error::argument("anaglyph offset must be within [0, 1]"));
        }
        Ok(Self { offset })
    }

    pub fn from_args(args: &[&str]) -> Result<Self> {
        match args {
            [offset] => Self::new(parse_arg(offset, "offset")?),
            _ => Err(Error::argument("anaglyph takes an offset")),
        }
    }

    /// Horizontal shift in pixels for an image of the given width.
    pub fn step(&self, width: usize) -> usize {
        (self.offset * width as f64).floor() as usize
    }

    pub fn apply(&self, image: &mut Image) {
        let width = image.width();
        let step = self.step(width);
        let source = image.to_array();
        let mut result = source.clone();

        // Rows are independent; within a row contributions accumulate in column order.
        Zip::from(result.rows_mut())
            .and(source.rows())
            .par_for_each(|mut acc, src| {
                let mut red_weight = vec![1.0f64; width];
                let mut blue_weight = vec![1.0f64; width];

                for j in 0..width {
                    if j + step < width {
                        acc[j + step].red += SHIFT_GAIN * src[j].red;
                        red_weight[j + step] += SHIFT_GAIN;
                    } else {
                        let m = width - j - 1;
                        acc[m].red += src[m].red;
                        red_weight[m] += 1.0;
                    }

                    if j >= step {
                        acc[j - step].blue += SHIFT_GAIN * src[j].blue;
                        blue_weight[j - step] += SHIFT_GAIN;
                    } else {
                        let m = width - j - 1;
                        acc[m].blue += src[m].blue;
                        blue_weight[m] += 1.0;
                    }
                }

                for (j, px) in acc.iter_mut().enumerate() {
                    px.red /= red_weight[j];
                    px.blue /= blue_weight[j];
                }
            });

        image.assign(&result);
    }
}
