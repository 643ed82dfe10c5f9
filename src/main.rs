//! Command-line front end: `image_processor <input> <output> [filters...]`.
//!
//! On failure the error and the list of available filters go to stderr and
//! no output file is written.

use std::process::ExitCode;

use image_processor::filters::Registry;
use image_processor::pipeline::{self, Options};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let registry = Registry::default();
    let result = Options::parse(std::env::args_os().skip(1))
        .and_then(|options| pipeline::run(&options, &registry));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %e, "processing failed");
            eprintln!("Error: {e}");
            eprint!("{}", registry.help_listing());
            ExitCode::FAILURE
        }
    }
}
