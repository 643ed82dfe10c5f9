//! Image Processor
//!
//! Decodes a 24-bit uncompressed BMP, runs a chain of filters over it and
//! encodes the result, with optional Python bindings via PyO3 and WASM
//! bindings for JavaScript.
//!
//! ## Image Format
//! Only one on-disk layout is accepted: `BITMAPFILEHEADER` +
//! `BITMAPINFOHEADER`, 24 bits per pixel, no compression, bottom-up rows
//! padded to 4 bytes. Everything else is rejected by [`bmp::Bitmap::decode`].
//!
//! In memory an image is an [`image::Image`]: a `(height, width)` grid of
//! [`color::Pixel`]s with `f64` channels in 0.0-1.0. Channels may leave that
//! range during filter math; they are clamped when quantized back to bytes.
//!
//! ## Filter Chain
//! Filters are resolved by CLI name through [`filters::Registry`] and applied
//! strictly left to right, each one seeing the previous one's output:
//!
//! ```text
//! image_processor in.bmp out.bmp -crop 800 600 -gs -blur 1.5
//! ```

pub mod bmp;
pub mod color;
pub mod error;
pub mod filters;
pub mod image;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bmp::Bitmap;
pub use color::{Kernel, Pixel};
pub use error::{Error, Result};
pub use filters::{Filter, Registry};
pub use image::Image;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array3;
    use numpy::{IntoPyArray, PyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::bmp::Bitmap;
    use crate::error::Error;
    use crate::filters::Registry;
    use crate::pipeline;

    fn to_py_err(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Run a filter chain over BMP file contents.
    ///
    /// # Arguments
    /// * `data` - Complete 24-bit BMP file
    /// * `args` - Filter tokens, e.g. `["-crop", "10", "10", "-neg"]`
    ///
    /// # Returns
    /// Encoded BMP bytes
    #[pyfunction]
    pub fn process_bmp<'py>(
        py: Python<'py>,
        data: &[u8],
        args: Vec<String>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let registry = Registry::default();
        let bytes = pipeline::process_to_vec(data, &args, &registry).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// Decode BMP file contents to a float64 array of shape (height, width, 3).
    ///
    /// Channels are RGB in 0.0-1.0; row 0 is the last row stored in the file.
    #[pyfunction]
    pub fn decode_bmp<'py>(py: Python<'py>, data: &[u8]) -> PyResult<Bound<'py, PyArray3<f64>>> {
        let bitmap = Bitmap::decode(data).map_err(to_py_err)?;
        let view = bitmap.image.view();
        let (height, width) = view.dim();
        let array = Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
            let px = view[[y, x]];
            match c {
                0 => px.red,
                1 => px.green,
                _ => px.blue,
            }
        });
        Ok(array.into_pyarray(py))
    }

    /// One `name,    help` line per available filter.
    #[pyfunction]
    pub fn filter_listing() -> String {
        Registry::default().help_listing()
    }

    /// Image processor extension module
    #[pymodule]
    pub fn image_processor(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(process_bmp, m)?)?;
        m.add_function(wrap_pyfunction!(decode_bmp, m)?)?;
        m.add_function(wrap_pyfunction!(filter_listing, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::image_processor;
