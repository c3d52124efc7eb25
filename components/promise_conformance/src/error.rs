//! Error types for loading configuration and emitting reports

use std::path::PathBuf;
use thiserror::Error;

/// Errors outside the cases themselves. Case failures are reported
/// through [`crate::TestReport`], never through this type.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Config file could not be read
    #[error("could not read config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::RunConfig`]
    #[error("invalid config '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report could not be serialized
    #[error("could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
