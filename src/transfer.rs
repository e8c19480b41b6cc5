//! The download capability the fetcher depends on.

use std::path::Path;

use crate::error::FetchError;
use crate::source::RemoteSource;

/// Retrieves one remote file and writes it to an exact local path.
///
/// This abstraction lets the fetch logic run against substitute
/// implementations in tests, without network I/O.
pub trait Transfer {
    /// Download `source` into `output`.
    ///
    /// On success `output` holds the complete file. Failures are reported as
    /// [`FetchError::TransferFailed`].
    fn transfer(&self, source: &RemoteSource, output: &Path) -> Result<(), FetchError>;
}

impl<T: Transfer + ?Sized> Transfer for &T {
    fn transfer(&self, source: &RemoteSource, output: &Path) -> Result<(), FetchError> {
        (**self).transfer(source, output)
    }
}

impl<T: Transfer + ?Sized> Transfer for Box<T> {
    fn transfer(&self, source: &RemoteSource, output: &Path) -> Result<(), FetchError> {
        (**self).transfer(source, output)
    }
}
