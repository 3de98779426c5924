//! Error types for keying operations.

use thiserror::Error;

/// Error type for the range configuration and frame stream layers.
///
/// The image operations themselves return [`keyer_core::Error`]; this type
/// wraps it together with frame I/O and configuration failures.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Pipeline or buffer contract violation.
    #[error(transparent)]
    Core(#[from] keyer_core::Error),

    /// Frame source or sink failure.
    #[error(transparent)]
    Io(#[from] keyer_io::IoError),

    /// Reading a configuration file failed.
    #[error("cannot read config: {0}")]
    File(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed but inconsistent configuration.
    #[error("invalid config: {0}")]
    Config(String),
}

impl OpsError {
    /// Returns `true` for a region outside the frame.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_out_of_bounds())
    }

    /// Returns `true` for a caller contract violation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_invalid_argument())
    }
}

/// Result type for configuration and stream operations.
pub type OpsResult<T> = Result<T, OpsError>;
