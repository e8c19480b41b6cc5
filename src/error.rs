use std::path::PathBuf;
use thiserror::Error;

/// The main error type for samplefetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid destination {path}: {reason}")]
    InvalidDestination { path: PathBuf, reason: String },

    #[error("Destination {path} already exists; aborting. To overwrite, use `--overwrite`.")]
    DestinationExists { path: PathBuf },

    #[error("Failed to download '{remote}': {message}")]
    TransferFailed { remote: String, message: String },

    #[error("Identifier must not be empty")]
    EmptyIdentifier,

    #[error("Invalid registry: {message}")]
    InvalidRegistry { message: String },

    #[error("Failed to parse registry file {path}: {message}")]
    RegistryParse { path: PathBuf, message: String },

    #[error("Failed to write JSON output: {source}")]
    JsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl FetchError {
    pub(crate) fn invalid_destination(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FetchError::InvalidDestination {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transfer_failed(remote: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::TransferFailed {
            remote: remote.into(),
            message: message.into(),
        }
    }
}
