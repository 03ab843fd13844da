//! Run configuration, manifest decoding, path resolution and manifest sites.
pub mod manifest;
pub mod path;
pub mod site;

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::ConfigError;

/// Environment variable naming the default root directory.
pub const ROOT_ENV: &str = "DOT";

/// Root directory used when neither `--dir` nor [`ROOT_ENV`] is given.
pub const DEFAULT_ROOT: &str = "../";

/// The three settings a link run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute root directory to scan for manifests.
    pub root: PathBuf,
    /// Print `ln` commands instead of touching the filesystem.
    pub dry_run: bool,
    /// Remove existing destinations before linking.
    pub force: bool,
}

impl Config {
    /// Build the configuration from parsed command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be made absolute.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let root = resolve_root(cli.dir.as_deref(), std::env::var(ROOT_ENV).ok())?;
        Ok(Self {
            root,
            dry_run: cli.dry,
            force: cli.force,
        })
    }
}

/// Pick the root directory (`--dir`, then `$DOT`, then `../`) and make it
/// absolute.
///
/// Relative roots are joined onto the current directory and normalized
/// lexically; symlinks in the root are not resolved.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(dir: Option<&Path>, env_root: Option<String>) -> Result<PathBuf, ConfigError> {
    let chosen = dir.map_or_else(
        || {
            env_root
                .filter(|value| !value.is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_ROOT), PathBuf::from)
        },
        Path::to_path_buf,
    );

    let absolute = std::path::absolute(&chosen).map_err(|source| ConfigError::Root {
        path: chosen.clone(),
        source,
    })?;
    Ok(path::clean_path(&absolute))
}
