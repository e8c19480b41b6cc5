//! Registry files.
//!
//! A registry file lists extra sample datasets in JSON or YAML:
//!
//! ```json
//! {
//!   "files": { "my_sample": "1AbCdEf" },
//!   "collections": {
//!     "my_set": [ { "file": "a.h5", "source": "1XyZ" } ]
//!   }
//! }
//! ```
//!
//! Both keys are optional. Entries are validated after parsing, so a file
//! that parses but contains path-like member names is still rejected.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::SampleRegistry;
use crate::error::FetchError;

/// Reads a registry file, picking the parser from the file extension.
///
/// # Errors
/// Returns an error if the extension is not `.json`, `.yaml` or `.yml`, if the
/// file cannot be read or parsed, or if an entry is invalid.
pub fn read_registry(path: &Path) -> Result<SampleRegistry, FetchError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let file = || File::open(path).map(BufReader::new);

    let registry: SampleRegistry = match extension.as_deref() {
        Some("json") => serde_json::from_reader(file()?).map_err(|source| {
            FetchError::RegistryParse {
                path: path.to_path_buf(),
                message: source.to_string(),
            }
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_reader(file()?).map_err(|source| {
            FetchError::RegistryParse {
                path: path.to_path_buf(),
                message: source.to_string(),
            }
        })?,
        _ => {
            return Err(FetchError::UnsupportedFormat(format!(
                "registry file '{}' (supported extensions: .json, .yaml, .yml)",
                path.display()
            )));
        }
    };

    registry.validate()?;
    registry.warn_ambiguous();
    Ok(registry)
}

/// Parses a registry from a JSON string without validating it.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<SampleRegistry, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a registry from JSON bytes without validating it.
pub fn from_json_slice(bytes: &[u8]) -> Result<SampleRegistry, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Parses a registry from a YAML string without validating it.
pub fn from_yaml_str(yaml: &str) -> Result<SampleRegistry, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Writes a registry as pretty-printed JSON.
pub fn to_json_string(registry: &SampleRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(registry)
}
