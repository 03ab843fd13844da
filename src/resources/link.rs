//! Link resource: a resolved `source -> destination` symlink request.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LinkError;

/// A single symlink request with both sides already resolved.
///
/// Links are produced by [`ManifestSite::links`](crate::config::site::ManifestSite::links)
/// and consumed exactly once by the applier; they are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    source: PathBuf,
    destination: PathBuf,
}

impl Link {
    /// Create a new link.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// What the symlink points to.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Where the symlink is created.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Shell command equivalent to applying this link.
    ///
    /// ```
    /// use dotlink::resources::link::Link;
    ///
    /// let link = Link::new("/a".into(), "/b".into());
    /// assert_eq!(link.command(false), "ln -s /a /b");
    /// assert_eq!(link.command(true), "ln -sf /a /b");
    /// ```
    #[must_use]
    pub fn command(&self, force: bool) -> String {
        let flags = if force { "-sf" } else { "-s" };
        format!(
            "ln {flags} {} {}",
            self.source.display(),
            self.destination.display()
        )
    }

    /// Create the symlink through `fs`, removing the destination first when
    /// `force` is set.
    ///
    /// A failed removal aborts the attempt; creation is not tried.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Removal`] if the destination cannot be removed and
    /// [`LinkError::Creation`] if the symlink cannot be created.
    pub fn apply<F: LinkFs + ?Sized>(&self, fs: &F, force: bool) -> Result<(), LinkError> {
        if force {
            fs.remove(&self.destination)
                .map_err(|source| LinkError::Removal {
                    link: self.clone(),
                    source,
                })?;
        }
        fs.symlink(&self.source, &self.destination)
            .map_err(|source| LinkError::Creation {
                link: self.clone(),
                source,
            })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Filesystem operations needed to apply a [`Link`].
///
/// [`SystemFs`] talks to the real filesystem; tests substitute a recording
/// fake to observe the call sequence.
pub trait LinkFs: Send + Sync {
    /// Remove the entry at `path`. A missing entry is an error.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}

/// [`LinkFs`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl LinkFs for SystemFs {
    fn remove(&self, path: &Path) -> io::Result<()> {
        remove_entry(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        create_symlink(target, link)
    }
}

/// Remove a file, symlink or empty directory.
///
/// Symlinks are inspected with `symlink_metadata`, so a link to a directory
/// is removed as a file and its target is left alone.
fn remove_entry(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so the raw `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::test_helpers::{FakeFs, FsCall};
    use super::*;

    fn link(src: &str, dst: &str) -> Link {
        Link::new(PathBuf::from(src), PathBuf::from(dst))
    }

    #[test]
    fn display_uses_arrow() {
        assert_eq!(link("/a", "/b").to_string(), "/a -> /b");
    }

    #[test]
    fn command_without_force() {
        assert_eq!(link("/a", "/b").command(false), "ln -s /a /b");
    }

    #[test]
    fn command_with_force() {
        assert_eq!(link("/a", "/b").command(true), "ln -sf /a /b");
    }

    #[test]
    fn apply_without_force_only_creates() {
        let fs = FakeFs::default();
        link("/a", "/b").apply(&fs, false).unwrap();
        assert_eq!(
            fs.calls(),
            vec![FsCall::Symlink(PathBuf::from("/a"), PathBuf::from("/b"))]
        );
    }

    #[test]
    fn apply_with_force_removes_then_creates() {
        let fs = FakeFs::default();
        link("/a", "/b").apply(&fs, true).unwrap();
        assert_eq!(
            fs.calls(),
            vec![
                FsCall::Remove(PathBuf::from("/b")),
                FsCall::Symlink(PathBuf::from("/a"), PathBuf::from("/b")),
            ]
        );
    }

    #[test]
    fn failed_removal_skips_creation() {
        let fs = FakeFs::default().fail_remove(io::ErrorKind::NotFound);
        let err = link("/a", "/b").apply(&fs, true).unwrap_err();
        assert!(matches!(err, LinkError::Removal { .. }));
        assert_eq!(fs.calls(), vec![FsCall::Remove(PathBuf::from("/b"))]);
    }

    #[test]
    fn failed_creation_is_creation_error() {
        let fs = FakeFs::default().fail_symlink(io::ErrorKind::PermissionDenied);
        let err = link("/a", "/b").apply(&fs, false).unwrap_err();
        assert!(matches!(err, LinkError::Creation { .. }));
        assert!(err.to_string().ends_with(": /a -> /b"));
    }

    #[cfg(unix)]
    #[test]
    fn system_fs_creates_symlink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "test").unwrap();

        Link::new(source.clone(), target.clone())
            .apply(&SystemFs, false)
            .unwrap();

        assert!(target.symlink_metadata().unwrap().is_symlink());
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
    }

    #[cfg(unix)]
    #[test]
    fn system_fs_second_apply_collides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "test").unwrap();
        let link = Link::new(source, target);

        link.apply(&SystemFs, false).unwrap();
        let err = link.apply(&SystemFs, false).unwrap_err();
        assert!(
            matches!(&err, LinkError::Creation { source, .. } if source.kind() == io::ErrorKind::AlreadyExists),
            "unexpected error: {err:?}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn system_fs_force_replaces_regular_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "new").unwrap();
        std::fs::write(&target, "old").unwrap();

        Link::new(source.clone(), target.clone())
            .apply(&SystemFs, true)
            .unwrap();

        assert_eq!(std::fs::read_link(&target).unwrap(), source);
    }

    #[cfg(unix)]
    #[test]
    fn system_fs_force_replaces_broken_symlink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "new").unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), &target).unwrap();

        Link::new(source.clone(), target.clone())
            .apply(&SystemFs, true)
            .unwrap();

        assert_eq!(std::fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn system_fs_force_missing_destination_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "new").unwrap();

        let err = Link::new(source, target.clone())
            .apply(&SystemFs, true)
            .unwrap_err();

        assert!(matches!(err, LinkError::Removal { .. }));
        assert!(target.symlink_metadata().is_err(), "nothing may be created");
    }

    #[cfg(unix)]
    #[test]
    fn system_fs_force_refuses_non_empty_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "new").unwrap();
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "data").unwrap();

        let err = Link::new(source, target.clone())
            .apply(&SystemFs, true)
            .unwrap_err();

        assert!(matches!(err, LinkError::Removal { .. }));
        assert!(target.join("keep").exists());
    }
}
