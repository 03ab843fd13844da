//! Single-consumer link application: preview or apply each link and bucket
//! the result.

use crossbeam_channel::Receiver;

use super::{Item, Outcome, fan_in};
use crate::error::{LinkError, SiteError};
use crate::resources::link::{Link, LinkFs, SystemFs};

/// Apply-time switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOpts {
    /// Record `ln` commands instead of touching the filesystem.
    pub dry_run: bool,
    /// Remove the destination before creating the link.
    pub force: bool,
}

/// What happened to a single link.
#[derive(Debug)]
pub enum LinkOutcome {
    /// Dry run: the command that would have been executed.
    Planned(String),
    /// The link was created.
    Linked(Link),
    /// Removal or creation failed.
    Failed(LinkError),
}

/// Consumes links and site errors and owns the [`Outcome`] buckets.
///
/// Only one applier drains a pipeline, so the buckets need no locking.
#[derive(Debug)]
pub struct LinkApplier<F = SystemFs> {
    opts: ApplyOpts,
    fs: F,
    outcome: Outcome,
}

impl LinkApplier {
    /// Create an applier that talks to the real filesystem.
    #[must_use]
    pub fn new(opts: ApplyOpts) -> Self {
        Self::with_fs(opts, SystemFs)
    }
}

impl<F: LinkFs> LinkApplier<F> {
    /// Create an applier backed by a custom [`LinkFs`].
    #[must_use]
    pub fn with_fs(opts: ApplyOpts, fs: F) -> Self {
        Self {
            opts,
            fs,
            outcome: Outcome::default(),
        }
    }

    /// Buckets recorded so far.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Preview or apply one link without recording it.
    #[must_use]
    pub fn apply_link(&self, link: &Link) -> LinkOutcome {
        if self.opts.dry_run {
            return LinkOutcome::Planned(link.command(self.opts.force));
        }
        match link.apply(&self.fs, self.opts.force) {
            Ok(()) => LinkOutcome::Linked(link.clone()),
            Err(e) => LinkOutcome::Failed(e),
        }
    }

    /// Apply a link and append the result to the matching bucket.
    ///
    /// Dry-run commands go to the file log only; the report prints them.
    pub fn record_link(&mut self, link: &Link) {
        match self.apply_link(link) {
            LinkOutcome::Planned(command) => {
                tracing::debug!(link = %link, "planned");
                self.outcome.commands.push(command);
            }
            LinkOutcome::Linked(link) => {
                tracing::debug!(link = %link, "linked");
                self.outcome.successes.push(link.to_string());
            }
            LinkOutcome::Failed(e) => {
                tracing::debug!(link = %e.link(), error = %e, "link failed");
                self.outcome.failures.push(e.to_string());
            }
        }
    }

    /// Append a site error to the errors bucket.
    pub fn record_error(&mut self, error: &SiteError) {
        tracing::debug!(error = %error, "manifest skipped");
        self.outcome.errors.push(error.to_string());
    }

    /// Handle one value from either stream.
    pub fn record(&mut self, item: Item) {
        match item {
            Item::Link(link) => self.record_link(&link),
            Item::Error(e) => self.record_error(&e),
        }
    }

    /// Drain both streams until each is closed and return the buckets.
    pub fn drain(mut self, links: &Receiver<Link>, errors: &Receiver<SiteError>) -> Outcome {
        fan_in(links, errors, |item| self.record(item));
        self.outcome
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::link::test_helpers::{FakeFs, FsCall};
    use std::io;
    use std::path::PathBuf;

    fn link(src: &str, dst: &str) -> Link {
        Link::new(PathBuf::from(src), PathBuf::from(dst))
    }

    const REAL: ApplyOpts = ApplyOpts {
        dry_run: false,
        force: false,
    };

    const FORCE: ApplyOpts = ApplyOpts {
        dry_run: false,
        force: true,
    };

    #[test]
    fn dry_run_records_plain_command() {
        let mut applier = LinkApplier::with_fs(
            ApplyOpts {
                dry_run: true,
                force: false,
            },
            FakeFs::default(),
        );
        applier.record_link(&link("/a", "/b"));

        assert_eq!(applier.outcome().commands, vec!["ln -s /a /b"]);
        assert!(applier.fs.calls().is_empty(), "dry run must not touch fs");
    }

    #[test]
    fn dry_run_force_records_force_command() {
        let mut applier = LinkApplier::with_fs(
            ApplyOpts {
                dry_run: true,
                force: true,
            },
            FakeFs::default(),
        );
        applier.record_link(&link("/a", "/b"));

        assert_eq!(applier.outcome().commands, vec!["ln -sf /a /b"]);
        assert!(applier.fs.calls().is_empty());
    }

    #[test]
    fn dry_run_command_is_logged_to_file_only() {
        let (log, _tmp, _guard) = crate::logging::isolated_logger();
        let mut applier = LinkApplier::with_fs(
            ApplyOpts {
                dry_run: true,
                force: false,
            },
            FakeFs::default(),
        );
        applier.record_link(&link("/a", "/b"));

        let contents = std::fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("[debug] planned link=/a -> /b"), "{contents}");
        assert!(!contents.contains("[dry run]"), "{contents}");
    }

    #[test]
    fn success_is_recorded_with_arrow() {
        let mut applier = LinkApplier::with_fs(REAL, FakeFs::default());
        applier.record_link(&link("/a", "/b"));

        assert_eq!(applier.outcome().successes, vec!["/a -> /b"]);
        assert!(applier.outcome().failures.is_empty());
    }

    #[test]
    fn force_removes_then_creates() {
        let mut applier = LinkApplier::with_fs(FORCE, FakeFs::default());
        applier.record_link(&link("/a", "/b"));

        assert_eq!(
            applier.fs.calls(),
            vec![
                FsCall::Remove(PathBuf::from("/b")),
                FsCall::Symlink(PathBuf::from("/a"), PathBuf::from("/b")),
            ]
        );
        assert_eq!(applier.outcome().successes.len(), 1);
    }

    #[test]
    fn failed_removal_is_failure_without_creation() {
        let fs = FakeFs::default().fail_remove(io::ErrorKind::NotFound);
        let mut applier = LinkApplier::with_fs(FORCE, fs);
        applier.record_link(&link("/a", "/b"));

        assert_eq!(applier.fs.calls(), vec![FsCall::Remove(PathBuf::from("/b"))]);
        assert_eq!(
            applier.outcome().failures,
            vec!["fake remove failure: /a -> /b"]
        );
        assert!(applier.outcome().successes.is_empty());
    }

    #[test]
    fn every_creation_error_kind_is_a_failure() {
        for kind in [
            io::ErrorKind::AlreadyExists,
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::NotFound,
            io::ErrorKind::Other,
        ] {
            let fs = FakeFs::default().fail_symlink(kind);
            let mut applier = LinkApplier::with_fs(REAL, fs);
            applier.record_link(&link("/a", "/b"));

            assert_eq!(
                applier.outcome().failures,
                vec!["fake symlink failure: /a -> /b"],
                "kind {kind:?}"
            );
        }
    }

    #[test]
    fn site_errors_go_to_errors_bucket() {
        let mut applier = LinkApplier::with_fs(REAL, FakeFs::default());
        applier.record(Item::Error(SiteError::Io {
            path: PathBuf::from("/dots/links.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        }));

        assert_eq!(
            applier.outcome().errors,
            vec!["read /dots/links.json: permission denied"]
        );
    }

    #[test]
    fn drain_consumes_both_streams() {
        let (link_tx, links) = crossbeam_channel::bounded(0);
        let (error_tx, errors) = crossbeam_channel::bounded(0);
        let producer = std::thread::spawn(move || {
            for i in 0..3 {
                link_tx
                    .send(link(&format!("/s{i}"), &format!("/d{i}")))
                    .unwrap();
            }
            error_tx
                .send(SiteError::Io {
                    path: PathBuf::from("/x"),
                    source: io::Error::other("nope"),
                })
                .unwrap();
        });

        let outcome = LinkApplier::with_fs(REAL, FakeFs::default()).drain(&links, &errors);
        producer.join().unwrap();

        assert_eq!(outcome.successes, vec!["/s0 -> /d0", "/s1 -> /d1", "/s2 -> /d2"]);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn second_plain_apply_is_a_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        let link = Link::new(source, target);

        let mut applier = LinkApplier::new(REAL);
        applier.record_link(&link);
        applier.record_link(&link);

        assert_eq!(applier.outcome().successes.len(), 1);
        assert_eq!(applier.outcome().failures.len(), 1);
        assert!(applier.outcome().failures[0].ends_with(&format!(": {link}")));
    }

    #[cfg(unix)]
    #[test]
    fn force_replaces_existing_link() {
        let temp_dir = tempfile::tempdir().unwrap();
        let old = temp_dir.path().join("old");
        let new = temp_dir.path().join("new");
        let target = temp_dir.path().join("target");
        std::fs::write(&old, "old").unwrap();
        std::fs::write(&new, "new").unwrap();
        std::os::unix::fs::symlink(&old, &target).unwrap();

        let mut applier = LinkApplier::new(FORCE);
        applier.record_link(&Link::new(new.clone(), target.clone()));

        assert_eq!(applier.outcome().successes.len(), 1);
        assert_eq!(std::fs::read_link(&target).unwrap(), new);
    }
}
