//! Manifest sites: a directory paired with the manifest that lives in it.
use std::path::{Path, PathBuf};

use super::{manifest, path};
use crate::error::SiteError;
use crate::resources::link::Link;

/// A directory containing a manifest file.
///
/// Relative sources in the manifest are resolved against `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSite {
    base_dir: PathBuf,
    manifest_path: PathBuf,
}

impl ManifestSite {
    /// Create a new site.
    #[must_use]
    pub const fn new(base_dir: PathBuf, manifest_path: PathBuf) -> Self {
        Self {
            base_dir,
            manifest_path,
        }
    }

    /// Directory the manifest's relative sources are joined onto.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Location of the manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Read and decode the manifest, resolving every entry into a [`Link`].
    ///
    /// Links come back in manifest order. The source is joined onto the base
    /// directory and resolved as a path, so a base directory that is not
    /// UTF-8 is kept byte for byte. The destination goes through
    /// [`path::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] if the manifest cannot be read and
    /// [`SiteError::Parse`] if it cannot be decoded. No links are returned in
    /// either case.
    pub fn links(&self) -> Result<Vec<Link>, SiteError> {
        self.links_with(|name| std::env::var(name).ok())
    }

    /// [`links`](Self::links) with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`links`](Self::links).
    pub fn links_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Vec<Link>, SiteError> {
        let bytes = std::fs::read(&self.manifest_path).map_err(|source| {
            tracing::debug!(
                manifest = %self.manifest_path.display(),
                error = %source,
                "cannot read manifest"
            );
            SiteError::Io {
                path: self.manifest_path.clone(),
                source,
            }
        })?;

        let manifest = manifest::parse(&bytes).map_err(|source| {
            tracing::debug!(
                manifest = %self.manifest_path.display(),
                error = %source,
                "cannot parse manifest"
            );
            SiteError::Parse {
                path: self.manifest_path.clone(),
                source,
            }
        })?;

        let links: Vec<Link> = manifest
            .iter()
            .map(|(source, destination)| {
                Link::new(
                    path::resolve_path_with(&self.base_dir.join(source), &lookup),
                    PathBuf::from(path::resolve_with(destination, &lookup)),
                )
            })
            .collect();

        tracing::debug!(
            site = %self.base_dir.display(),
            links = links.len(),
            "manifest resolved"
        );
        Ok(links)
    }
}
