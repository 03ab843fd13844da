//! Domain-specific error types for the link engine.
//!
//! Each layer returns its own [`thiserror`] enum. The command handler at the
//! CLI boundary converts the fatal ones to [`anyhow::Error`] via `?`; the
//! per-site and per-link errors never leave the pipeline and are turned into
//! report lines instead.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError    - root directory resolution (fatal)
//! ScanError      - the walk cannot start (fatal)
//! PipelineError  - a worker panicked (fatal)
//! SiteError      - one manifest unreadable or malformed (reported)
//! ├── Io
//! └── Parse(ManifestError)
//! LinkError      - one symlink could not be applied (reported)
//! ├── Removal
//! └── Creation
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::resources::link::Link;

/// Errors that arise while building the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The root directory could not be turned into an absolute path.
    #[error("cannot resolve root directory {}: {source}", path.display())]
    Root {
        /// Root directory as given on the command line or in the environment.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that prevent the directory scan from starting.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The root exists but is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// Root that was requested.
        path: PathBuf,
    },

    /// The root could not be inspected (missing, permission denied, ...).
    #[error("cannot scan {}: {source}", path.display())]
    Io {
        /// Root that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// A manifest whose content is not a JSON object of strings.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ManifestError(#[from] pub serde_json::Error);

/// Errors raised while turning one manifest site into links.
#[derive(Error, Debug)]
pub enum SiteError {
    /// The manifest file could not be read.
    #[error("read {}: {source}", path.display())]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The manifest file could not be decoded.
    #[error("parse {}: {source}", path.display())]
    Parse {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying decode error.
        source: ManifestError,
    },
}

/// Errors raised while applying a single link.
///
/// Both variants render as `<io-error>: <source> -> <destination>`.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Force mode could not remove the existing destination.
    #[error("{source}: {link}")]
    Removal {
        /// Link whose destination could not be removed.
        link: Link,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The symlink itself could not be created.
    #[error("{source}: {link}")]
    Creation {
        /// Link that could not be created.
        link: Link,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl LinkError {
    /// The link this error belongs to.
    #[must_use]
    pub const fn link(&self) -> &Link {
        match self {
            Self::Removal { link, .. } | Self::Creation { link, .. } => link,
        }
    }
}

/// Errors raised by the pipeline driver itself.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A worker thread panicked before the streams were closed.
    #[error("link pipeline worker panicked")]
    WorkerPanicked,
}
