//! Basic operations: crop and negative.

use crate::error::{Error, Result};
use crate::image::Image;

use super::parse_arg;

/// Shrink the image to at most `width` x `height`, keeping the first rows and
/// columns of the buffer. Never grows either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::argument("crop size must be positive"));
        }
        Ok(Self { width, height })
    }

    /// Parse `[width, height]`.
    pub fn from_args(args: &[&str]) -> Result<Self> {
        match args {
            [width, height] => Self::new(parse_arg(width, "width")?, parse_arg(height, "height")?),
            _ => Err(Error::argument("crop takes width and height")),
        }
    }

    pub fn apply(&self, image: &mut Image) {
        image.crop(self.width as usize, self.height as usize);
    }
}

/// Invert every channel: `c -> 1 - c`.
pub fn negative(image: &mut Image) {
    image.view_mut().par_map_inplace(|px| {
        *px = px.map(|c| 1.0 - c);
    });
}
