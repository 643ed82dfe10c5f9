//! Error type shared by the codec, the filter registry and the CLI glue.

/// Errors raised while decoding, filtering or encoding a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wrong file format")]
    Format,

    #[error("header name is not BitMapInfoHeader")]
    HeaderSize,

    #[error("unsupported BMP bit count")]
    BitDepth,

    #[error("unsupported BMP compression")]
    Compression,

    #[error("top-down or negative-sized bitmaps are not supported")]
    TopDown,

    #[error("truncated bitmap: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid options: unknown filter {0:?}")]
    UnknownFilter(String),

    #[error("invalid options: {0}")]
    Argument(String),

    #[error("empty options")]
    EmptyOptions,

    #[error("empty output file")]
    EmptyOutputFile,

    #[error("invalid input file: {0}")]
    InvalidInputFile(String),

    #[error("invalid output file: {0}")]
    InvalidOutputFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for image processor operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an [`Error::Argument`] with a formatted reason.
    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        Error::Argument(reason.into())
    }
}
