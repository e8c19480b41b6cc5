//! Classification of remote references into URLs and raw file IDs.

use std::fmt;

/// A single remote file, either a full URL or an opaque file ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RemoteSource {
    Url(String),
    FileId(String),
}

impl RemoteSource {
    /// Classify `reference`.
    ///
    /// A reference is a URL when its first four characters are `http`,
    /// compared case-insensitively. Everything else is a raw file ID.
    pub fn classify(reference: &str) -> Self {
        if looks_like_url(reference) {
            RemoteSource::Url(reference.to_string())
        } else {
            RemoteSource::FileId(reference.to_string())
        }
    }

    /// The reference exactly as it was given.
    pub fn as_str(&self) -> &str {
        match self {
            RemoteSource::Url(value) | RemoteSource::FileId(value) => value,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, RemoteSource::Url(_))
    }
}

impl fmt::Display for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn looks_like_url(reference: &str) -> bool {
    reference
        .as_bytes()
        .get(..4)
        .map(|prefix| prefix.eq_ignore_ascii_case(b"http"))
        .unwrap_or(false)
}
