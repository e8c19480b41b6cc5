//! Destination checks and overwrite handling.
//!
//! Every check here runs before the first byte is downloaded, so a refused
//! fetch leaves the filesystem exactly as it found it.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::FetchError;

/// The parent directory given for a collection must already exist.
pub(crate) fn require_directory(path: &Path) -> Result<(), FetchError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FetchError::invalid_destination(
            path,
            "expected an existing directory, found a file",
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(
            FetchError::invalid_destination(path, "specified directory does not exist"),
        ),
        Err(err) => Err(err.into()),
    }
}

/// Make `dir` an empty-or-fresh collection directory.
///
/// A populated directory is refused unless `overwrite` is set, in which case
/// the files directly inside it are removed. Nested directories are kept.
pub(crate) fn prepare_collection_dir(dir: &Path, overwrite: bool) -> Result<(), FetchError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(FetchError::invalid_destination(
                dir,
                "collection path exists and is not a directory",
            ));
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(dir)?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    if entries.is_empty() {
        return Ok(());
    }
    if !overwrite {
        return Err(FetchError::DestinationExists {
            path: dir.to_path_buf(),
        });
    }

    tracing::info!(
        path = %dir.display(),
        entries = entries.len(),
        "collection directory already populated; removing existing files before downloading"
    );
    for entry in entries {
        if entry.file_type()?.is_dir() {
            continue;
        }
        fs::remove_file(entry.path())?;
    }
    Ok(())
}

/// Clear the way for a single-file download to `path`.
pub(crate) fn prepare_file_destination(path: &Path, overwrite: bool) -> Result<(), FetchError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(FetchError::invalid_destination(
            path,
            "expected a file path, found a directory",
        )),
        Ok(_) if overwrite => {
            tracing::info!(path = %path.display(), "file already existed, downloading and overwriting");
            fs::remove_file(path)?;
            Ok(())
        }
        Ok(_) => Err(FetchError::DestinationExists {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
            match parent {
                Some(parent) if !parent.is_dir() => Err(FetchError::invalid_destination(
                    path,
                    "parent directory does not exist",
                )),
                _ => Ok(()),
            }
        }
        Err(err) => Err(err.into()),
    }
}
