//! WebAssembly exports.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and work on
//! complete BMP file contents.

use wasm_bindgen::prelude::*;

use crate::filters::Registry;
use crate::pipeline::process_to_vec;

/// Run a filter chain over BMP file contents.
///
/// # Arguments
/// * `data` - Complete 24-bit BMP file
/// * `args` - Filter tokens, e.g. `["-gs", "-blur", "2"]`
///
/// # Returns
/// Encoded BMP bytes, or the error message as a JS string
#[wasm_bindgen]
pub fn process_bmp_wasm(data: &[u8], args: Vec<String>) -> Result<Vec<u8>, JsValue> {
    let registry = Registry::default();
    process_to_vec(data, &args, &registry).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Available filters, one `name,    help` line each.
#[wasm_bindgen]
pub fn filter_listing_wasm() -> String {
    Registry::default().help_listing()
}
