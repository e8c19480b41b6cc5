//! Registry of named sample datasets.
//!
//! Two namespaces live side by side: single files (name -> remote file ID)
//! and collections (name -> ordered list of local file names with their
//! remote ID or URL). Lookups check collections first.
//!
//! The built-in registry is constructed once per process and never mutated.
//! Callers that want extra entries build their own registry and
//! [`SampleRegistry::merge`] it over a clone of the built-in one.

pub mod io;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One member of a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionFile {
    /// Local file name inside the collection directory.
    pub file: String,
    /// Remote file ID or URL.
    pub source: String,
}

impl CollectionFile {
    pub fn new(file: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
        }
    }
}

/// What a registered name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEntry<'a> {
    Collection(&'a [CollectionFile]),
    File(&'a str),
}

/// Name -> remote ID mappings for single files and collections.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleRegistry {
    files: BTreeMap<String, String>,
    collections: BTreeMap<String, Vec<CollectionFile>>,
}

const BUILTIN_FILES: &[(&str, &str)] = &[
    ("FCU-Net", "1-KX0saEYfhZ9IJAOwabH38PCVtfXidJi"),
    (
        "sample_diffraction_pattern",
        "1ymYMnuDC0KV6dqduxe2O1qafgSd0jjnU",
    ),
];

const BUILTIN_COLLECTIONS: &[(&str, &[(&str, &str)])] = &[(
    "unit_test_data",
    &[("dm_test_file.dm3", "1RxI1QY6vYMDqqMVPt5GBN6Q_iCwHFU4B")],
)];

impl SampleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of sample datasets shipped with the crate.
    pub fn builtin() -> &'static SampleRegistry {
        static BUILTIN: OnceLock<SampleRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| SampleRegistry {
            files: BUILTIN_FILES
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
            collections: BUILTIN_COLLECTIONS
                .iter()
                .map(|(name, members)| {
                    let members = members
                        .iter()
                        .map(|(file, source)| CollectionFile::new(*file, *source))
                        .collect();
                    (name.to_string(), members)
                })
                .collect(),
        })
    }

    /// Add (or replace) a single-file entry.
    pub fn with_file(mut self, name: impl Into<String>, file_id: impl Into<String>) -> Self {
        self.files.insert(name.into(), file_id.into());
        self
    }

    /// Add (or replace) a collection entry.
    ///
    /// Fails when the collection name or any member file name is not a plain
    /// file name, or when a member name repeats.
    pub fn with_collection<I, F, S>(mut self, name: impl Into<String>, members: I) -> Result<Self, FetchError>
    where
        I: IntoIterator<Item = (F, S)>,
        F: Into<String>,
        S: Into<String>,
    {
        let name = name.into();
        let members: Vec<CollectionFile> = members
            .into_iter()
            .map(|(file, source)| CollectionFile::new(file, source))
            .collect();
        validate_collection(&name, &members)?;
        self.collections.insert(name, members);
        Ok(self)
    }

    /// Remote file ID registered under `name`, if any.
    pub fn file_id(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Members of the collection registered under `name`, if any.
    pub fn collection(&self, name: &str) -> Option<&[CollectionFile]> {
        self.collections.get(name).map(Vec::as_slice)
    }

    /// Resolve `name`, checking collections before single files.
    pub fn lookup(&self, name: &str) -> Option<RegistryEntry<'_>> {
        self.collection(name)
            .map(RegistryEntry::Collection)
            .or_else(|| self.file_id(name).map(RegistryEntry::File))
    }

    /// Single-file names in sorted order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Collection names in sorted order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Names registered both as a single file and as a collection.
    ///
    /// For these names the collection shadows the file entry.
    pub fn ambiguous_names(&self) -> Vec<&str> {
        let files: BTreeSet<&str> = self.file_names().collect();
        self.collection_names()
            .filter(|name| files.contains(name))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.collections.is_empty()
    }

    /// Layer `other` over `self`. Entries in `other` replace same-named
    /// entries in the same namespace.
    pub fn merge(&mut self, other: SampleRegistry) {
        self.files.extend(other.files);
        self.collections.extend(other.collections);
        self.warn_ambiguous();
    }

    /// Check every entry for structural problems.
    pub fn validate(&self) -> Result<(), FetchError> {
        for (name, id) in &self.files {
            if name.trim().is_empty() {
                return Err(FetchError::InvalidRegistry {
                    message: "file entry with an empty name".to_string(),
                });
            }
            if id.trim().is_empty() {
                return Err(FetchError::InvalidRegistry {
                    message: format!("file '{name}' has an empty remote id"),
                });
            }
        }
        for (name, members) in &self.collections {
            validate_collection(name, members)?;
        }
        Ok(())
    }

    pub(crate) fn warn_ambiguous(&self) {
        for name in self.ambiguous_names() {
            tracing::warn!(
                name,
                "name is registered both as a file and as a collection; the collection wins"
            );
        }
    }
}

fn validate_collection(name: &str, members: &[CollectionFile]) -> Result<(), FetchError> {
    if !is_plain_file_name(name) {
        return Err(FetchError::InvalidRegistry {
            message: format!("collection name '{name}' must be a plain directory name"),
        });
    }
    if members.is_empty() {
        return Err(FetchError::InvalidRegistry {
            message: format!("collection '{name}' has no files"),
        });
    }

    let mut seen = BTreeSet::new();
    for member in members {
        if !is_plain_file_name(&member.file) {
            return Err(FetchError::InvalidRegistry {
                message: format!(
                    "collection '{name}': '{}' must be a plain file name",
                    member.file
                ),
            });
        }
        if member.source.trim().is_empty() {
            return Err(FetchError::InvalidRegistry {
                message: format!("collection '{name}': '{}' has an empty source", member.file),
            });
        }
        if !seen.insert(member.file.as_str()) {
            return Err(FetchError::InvalidRegistry {
                message: format!("collection '{name}': duplicate file name '{}'", member.file),
            });
        }
    }
    Ok(())
}

/// A single path component that cannot escape its parent directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
