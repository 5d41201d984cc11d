//! Error types for matting data synthesis

use thiserror::Error;

/// Result type alias for synthesis operations
pub type Result<T> = std::result::Result<T, MattingError>;

/// Comprehensive error types for matting data synthesis
#[derive(Error, Debug)]
pub enum MattingError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or decoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Sample name does not decode into a foreground/background index pair
    #[error("Invalid sample name '{name}': expected '<fg>_<bg>.<ext>'")]
    InvalidSampleName {
        /// The offending manifest entry
        name: String,
    },

    /// A decoded index points past the end of its manifest list
    #[error("{kind} index {index} out of range (list has {len} entries)")]
    IndexOutOfRange {
        /// Which list was indexed ("sample", "foreground", "background")
        kind: &'static str,
        /// The offending index
        index: usize,
        /// Length of the indexed list
        len: usize,
    },

    /// An image asset could not be read or decoded
    #[error("Missing asset '{path}': {source}")]
    MissingAsset {
        /// Path that failed to load
        path: std::path::PathBuf,
        /// Underlying decode error
        source: image::ImageError,
    },

    /// A transform received a zero-area or mismatched buffer
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MattingError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new degenerate geometry error
    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Create a new invalid sample name error
    pub fn invalid_sample_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidSampleName { name: name.into() }
    }

    /// Create a new index-out-of-range error for one of the manifest lists
    pub fn index_out_of_range(kind: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { kind, index, len }
    }

    /// Create a missing asset error with path context
    pub fn missing_asset<P: Into<std::path::PathBuf>>(path: P, error: image::ImageError) -> Self {
        Self::MissingAsset {
            path: path.into(),
            source: error,
        }
    }

    /// Wrap an I/O error with the operation and the path it touched
    ///
    /// Manifest and configuration reads go through this so a failing
    /// dataset root is identifiable from the message alone.
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: std::io::Error,
    ) -> Self {
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("could not {operation} '{}': {error}", path.as_ref().display()),
        ))
    }

    /// Range error for a configuration parameter, with the accepted span
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let hint = match recommended {
            Some(rec) => format!(", try {rec}"),
            None => String::new(),
        };
        Self::InvalidConfig(format!(
            "{parameter} {value} outside accepted range {valid_range}{hint}"
        ))
    }
}
