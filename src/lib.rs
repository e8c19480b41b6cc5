//! samplefetch: fetch sample datasets from Google Drive.
//!
//! An identifier is resolved to one or more downloads: a registered
//! collection name becomes a directory of files, a registered file name
//! becomes its remote file ID, and anything else is used directly as a URL
//! (when it starts with `http`, in any case) or a Drive file ID. Existing
//! destination content is never replaced unless overwriting is requested.
//!
//! # Modules
//!
//! - [`fetch`]: The fetcher (`fetch`, `list_registered`)
//! - [`registry`]: Built-in and file-based sample registries
//! - [`source`]: URL / file ID classification
//! - [`transfer`]: The download capability the fetcher drives
//! - [`drive`]: Google Drive client (feature `drive`)
//! - [`error`]: Error types for samplefetch operations

pub mod error;
pub mod fetch;
pub mod logging;
pub mod registry;
pub mod source;
pub mod transfer;

#[cfg(feature = "drive")]
pub mod drive;

#[cfg(feature = "drive")]
mod cli;

pub use error::FetchError;
pub use fetch::{fetch, list_registered, FetchOptions, Fetcher, RegisteredNames};
pub use registry::{CollectionFile, RegistryEntry, SampleRegistry};
pub use source::RemoteSource;
pub use transfer::Transfer;

#[cfg(feature = "drive")]
pub use cli::run;

/// Fetch `identifier` from Google Drive using the built-in registry.
///
/// This is the one-call form of [`Fetcher::fetch`] with a default
/// [`drive::DriveClient`].
#[cfg(feature = "drive")]
pub fn fetch_sample(identifier: &str, destination: &std::path::Path, overwrite: bool) -> Result<(), FetchError> {
    let client = drive::DriveClient::new(drive::DriveConfig::default())?;
    fetch(
        SampleRegistry::builtin(),
        client,
        identifier,
        destination,
        &FetchOptions::overwrite(overwrite),
    )
}

/// Names in the built-in registry.
pub fn builtin_samples() -> RegisteredNames {
    list_registered(SampleRegistry::builtin())
}
