//! Filter modules for image processing effects.
//!
//! ## Buffer Format
//!
//! All filters operate in place on an [`Image`]: a `(height, width)` grid of
//! RGB pixels with `f64` channels in 0.0-1.0. Only the logical region is
//! read and written, so a cropped image never exposes its stale remainder.
//!
//! ## Architecture
//!
//! - **Pointwise** - grayscale, negative (`par_map_inplace`)
//! - **Kernel** - sharpen, edge detection (shared `core::apply_kernel`)
//! - **Separable** - gaussian blur (two 1D passes)
//! - **Row-local scatter** - anaglyph
//!
//! Every pass reads a snapshot and writes distinct output cells, so the rayon
//! parallel loops give the same result as a sequential sweep.
//!
//! A [`Filter`] is a fully parsed invocation. The [`registry`] maps CLI names
//! to constructors and drives them left to right over the argument list.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::image::Image;

pub mod anaglyph;
pub mod basic;
pub mod blur;
pub mod core;
pub mod edge;
pub mod grayscale;
pub mod registry;
pub mod sharpen;

pub use anaglyph::Anaglyph;
pub use basic::Crop;
pub use blur::GaussianBlur;
pub use edge::EdgeDetection;
pub use registry::{FilterSpec, Registry};

/// One filter invocation with its arguments already parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Crop(Crop),
    GrayScale,
    Negative,
    Sharpening,
    EdgeDetection(EdgeDetection),
    GaussianBlur(GaussianBlur),
    Anaglyph(Anaglyph),
}

impl Filter {
    /// Apply the filter to `image` in place.
    pub fn apply(&self, image: &mut Image) {
        match self {
            Filter::Crop(crop) => crop.apply(image),
            Filter::GrayScale => grayscale::grayscale(image),
            Filter::Negative => basic::negative(image),
            Filter::Sharpening => sharpen::sharpen(image),
            Filter::EdgeDetection(edge) => edge.apply(image),
            Filter::GaussianBlur(blur) => blur.apply(image),
            Filter::Anaglyph(anaglyph) => anaglyph.apply(image),
        }
    }
}

/// Parse one numeric argument, naming it in the error.
pub(crate) fn parse_arg<T: FromStr>(token: &str, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::argument(format!("{what} must be a number, got {token:?}")))
}

/// Reject any argument for filters that take none.
pub(crate) fn no_args(args: &[&str], filter: Filter) -> Result<Filter> {
    if args.is_empty() {
        Ok(filter)
    } else {
        Err(Error::argument(format!("unexpected arguments {args:?}")))
    }
}
