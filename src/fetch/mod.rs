//! Fetching registered samples, raw file IDs and URLs to local paths.

mod destination;

use std::path::Path;

use serde::Serialize;

use crate::error::FetchError;
use crate::registry::{CollectionFile, RegistryEntry, SampleRegistry};
use crate::source::RemoteSource;
use crate::transfer::Transfer;

/// Fetch options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Replace existing destination content instead of refusing.
    pub overwrite: bool,
}

impl FetchOptions {
    pub fn overwrite(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

/// Names known to a registry, for discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegisteredNames {
    pub files: Vec<String>,
    pub collections: Vec<String>,
}

/// Resolves identifiers against a registry and drives a [`Transfer`].
pub struct Fetcher<'r, T> {
    registry: &'r SampleRegistry,
    transfer: T,
}

impl<'r, T: Transfer> Fetcher<'r, T> {
    pub fn new(registry: &'r SampleRegistry, transfer: T) -> Self {
        Self { registry, transfer }
    }

    pub fn registry(&self) -> &SampleRegistry {
        self.registry
    }

    /// Fetch `identifier` to `destination`.
    ///
    /// - A collection name downloads every member, in order, into
    ///   `destination/<identifier>/`. `destination` must be an existing
    ///   directory.
    /// - Anything else downloads one file to exactly `destination`. A
    ///   registered file name is replaced by its remote ID first; otherwise
    ///   the identifier is used as a URL or raw file ID.
    ///
    /// Existing content is refused with [`FetchError::DestinationExists`]
    /// unless `options.overwrite` is set. The first failed download aborts
    /// the rest of a collection; files already downloaded stay on disk.
    pub fn fetch(
        &self,
        identifier: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<(), FetchError> {
        if identifier.trim().is_empty() {
            return Err(FetchError::EmptyIdentifier);
        }

        match self.registry.lookup(identifier) {
            Some(RegistryEntry::Collection(members)) => {
                self.fetch_collection(identifier, members, destination, options)
            }
            Some(RegistryEntry::File(file_id)) => {
                self.fetch_single(identifier, file_id, destination, options)
            }
            None => self.fetch_single(identifier, identifier, destination, options),
        }
    }

    /// Names known to the registry this fetcher was built with.
    pub fn list_registered(&self) -> RegisteredNames {
        list_registered(self.registry)
    }

    fn fetch_collection(
        &self,
        name: &str,
        members: &[CollectionFile],
        parent: &Path,
        options: &FetchOptions,
    ) -> Result<(), FetchError> {
        destination::require_directory(parent)?;
        let target = parent.join(name);
        destination::prepare_collection_dir(&target, options.overwrite)?;

        tracing::debug!(
            collection = name,
            files = members.len(),
            path = %target.display(),
            "fetching collection"
        );
        for member in members {
            let source = RemoteSource::classify(&member.source);
            self.transfer.transfer(&source, &target.join(&member.file))?;
        }
        Ok(())
    }

    fn fetch_single(
        &self,
        identifier: &str,
        reference: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<(), FetchError> {
        destination::prepare_file_destination(destination, options.overwrite)?;

        let source = RemoteSource::classify(reference);
        tracing::debug!(
            identifier,
            remote = %source,
            path = %destination.display(),
            "fetching file"
        );
        self.transfer.transfer(&source, destination)
    }
}

/// Fetch `identifier` to `destination` using `registry` and `transfer`.
///
/// See [`Fetcher::fetch`].
pub fn fetch<T: Transfer>(
    registry: &SampleRegistry,
    transfer: T,
    identifier: &str,
    destination: &Path,
    options: &FetchOptions,
) -> Result<(), FetchError> {
    Fetcher::new(registry, transfer).fetch(identifier, destination, options)
}

/// Registered single-file and collection names, each sorted.
pub fn list_registered(registry: &SampleRegistry) -> RegisteredNames {
    RegisteredNames {
        files: registry.file_names().map(str::to_string).collect(),
        collections: registry.collection_names().map(str::to_string).collect(),
    }
}
