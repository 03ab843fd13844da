//! The link command: scan the root, fan out over every manifest, apply the
//! links and print the report.
use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::discovery;
use crate::logging::Logger;
use crate::pipeline::{self, ApplyOpts, Outcome};
use crate::report;

/// Run the link command.
///
/// Per-link and per-manifest problems end up in the report; only a bad root,
/// an unreadable root directory or a crashed worker make this fail.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or scanned, if a pipeline
/// worker panicked, or if the report cannot be written.
pub fn run(args: &Cli, log: &Logger) -> Result<()> {
    let config = Config::from_cli(args).context("resolving root directory")?;
    let outcome = execute(&config, log)?;
    report::print(&outcome).context("writing report")?;
    log.log_location();
    Ok(())
}

/// Scan and apply without printing the report.
///
/// # Errors
///
/// Returns an error if the root cannot be scanned or a pipeline worker
/// panicked.
pub fn execute(config: &Config, log: &Logger) -> Result<Outcome> {
    log.stage(&format!("Scanning {}", config.root.display()));
    let sites = discovery::scan(&config.root)
        .with_context(|| format!("scanning {}", config.root.display()))?;
    log.info(&format!("found {} manifest(s)", sites.len()));
    for site in &sites {
        log.debug(&format!("manifest: {}", site.manifest_path().display()));
    }

    log.stage("Linking");
    if config.dry_run {
        log.dry_run("no changes will be made");
    }
    if config.force {
        log.debug("force: existing destinations will be removed");
    }

    let outcome = pipeline::run(
        sites,
        ApplyOpts {
            dry_run: config.dry_run,
            force: config.force,
        },
    )?;

    log.info(&outcome.summary(config.dry_run));
    if !outcome.failures.is_empty() || !outcome.errors.is_empty() {
        log.warn(&format!(
            "{} link(s) failed, {} manifest(s) could not be read",
            outcome.failures.len(),
            outcome.errors.len()
        ));
    }
    Ok(outcome)
}
