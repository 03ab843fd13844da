//! Manifest discovery: walk a root directory and collect every manifest site.
use std::path::Path;

use walkdir::WalkDir;

use crate::config::manifest::MANIFEST_FILE;
use crate::config::site::ManifestSite;
use crate::error::ScanError;

/// Recursively scan `root` for [`MANIFEST_FILE`] entries.
///
/// Each match becomes a [`ManifestSite`] for the directory that holds it.
/// Symlinks are not followed and directories named like the manifest are
/// ignored. Entries that cannot be read (for example permission-denied
/// subtrees) are logged and skipped.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if `root` cannot be inspected and
/// [`ScanError::NotADirectory`] if it is not a directory.
pub fn scan(root: &Path) -> Result<Vec<ManifestSite>, ScanError> {
    let meta = std::fs::metadata(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut sites = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_dir() || entry.file_name() != MANIFEST_FILE {
            continue;
        }
        let Some(base_dir) = entry.path().parent() else {
            continue;
        };
        tracing::debug!(manifest = %entry.path().display(), "found manifest");
        sites.push(ManifestSite::new(
            base_dir.to_path_buf(),
            entry.path().to_path_buf(),
        ));
    }
    Ok(sites)
}
