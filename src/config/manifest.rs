//! `links.json` manifest decoding.
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ManifestError;

/// File name that marks a directory as a manifest site.
pub const MANIFEST_FILE: &str = "links.json";

/// Decoded manifest: relative source -> destination, in document order.
///
/// When a key appears more than once the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, String>,
}

impl Manifest {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest declares no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(relative source, destination)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Decode manifest bytes.
///
/// # Errors
///
/// Returns an error if the content is not a JSON object whose values are all
/// strings. No partial result is returned.
pub fn parse(bytes: &[u8]) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_slice(bytes)?)
}
