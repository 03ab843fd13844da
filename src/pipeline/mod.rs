//! The discovery -> parse -> aggregate -> apply pipeline.
//!
//! This module is split into sub-modules:
//!
//! - [`parallel`] - fan-out of manifest sites over the Rayon pool onto two
//!   rendezvous channels
//! - [`apply`] - the single consumer that applies links and fills the
//!   [`Outcome`] buckets

pub mod apply;
pub mod parallel;

pub use apply::{ApplyOpts, LinkApplier, LinkOutcome};
pub use parallel::LinkPipeline;

use crossbeam_channel::{Receiver, never, select};

use crate::config::site::ManifestSite;
use crate::error::{PipelineError, SiteError};
use crate::resources::link::Link;

/// Anything that can be turned into an ordered list of links.
///
/// [`ManifestSite`] is the production implementation; the pipeline only
/// depends on this trait so tests can feed it in-memory sites.
pub trait LinkSource {
    /// Produce every link of this source, or the single error that stopped it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or decoded.
    fn links(&self) -> Result<Vec<Link>, SiteError>;
}

impl LinkSource for ManifestSite {
    fn links(&self) -> Result<Vec<Link>, SiteError> {
        Self::links(self)
    }
}

/// One value taken off either pipeline stream.
#[derive(Debug)]
pub enum Item {
    /// A resolved link.
    Link(Link),
    /// A site that failed to produce links.
    Error(SiteError),
}

/// Receive from both streams until each has been closed, passing every value
/// to `handle` one at a time.
///
/// A closed stream is swapped for [`never`] so the select keeps waiting on the
/// other one only.
pub fn fan_in(
    links: &Receiver<Link>,
    errors: &Receiver<SiteError>,
    mut handle: impl FnMut(Item),
) {
    let closed_links = never();
    let closed_errors = never();
    let mut links_open = true;
    let mut errors_open = true;

    while links_open || errors_open {
        let link_rx = if links_open { links } else { &closed_links };
        let error_rx = if errors_open { errors } else { &closed_errors };
        select! {
            recv(link_rx) -> msg => match msg {
                Ok(link) => handle(Item::Link(link)),
                Err(_) => links_open = false,
            },
            recv(error_rx) -> msg => match msg {
                Ok(e) => handle(Item::Error(e)),
                Err(_) => errors_open = false,
            },
        }
    }
}

/// Report buckets filled by the applier.
///
/// Every bucket is append-only and owned by a single consumer; order within a
/// bucket is arrival order.
///
/// # Examples
///
/// ```
/// use dotlink::pipeline::Outcome;
///
/// let mut outcome = Outcome::default();
/// assert!(outcome.is_empty());
/// outcome.successes.push("/a -> /b".into());
/// assert_eq!(outcome.summary(false), "1 linked, 0 failed, 0 errors");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Preview commands recorded in dry-run mode.
    pub commands: Vec<String>,
    /// Links that were created.
    pub successes: Vec<String>,
    /// Links that could not be created.
    pub failures: Vec<String>,
    /// Manifests that could not be read or decoded.
    pub errors: Vec<String>,
}

impl Outcome {
    /// Whether nothing at all was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.successes.is_empty()
            && self.failures.is_empty()
            && self.errors.is_empty()
    }

    /// One-line count summary, e.g. `"3 linked, 1 failed, 0 errors"`.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        if dry_run {
            format!(
                "{} would link, {} errors",
                self.commands.len(),
                self.errors.len()
            )
        } else {
            format!(
                "{} linked, {} failed, {} errors",
                self.successes.len(),
                self.failures.len(),
                self.errors.len()
            )
        }
    }
}

/// Run the whole pipeline over `sites` and apply every link with `opts`.
///
/// Blocks until every site has been processed and both streams are drained.
///
/// # Errors
///
/// Returns [`PipelineError::WorkerPanicked`] if a site task panicked.
pub fn run<S>(sites: Vec<S>, opts: ApplyOpts) -> Result<Outcome, PipelineError>
where
    S: LinkSource + Send + 'static,
{
    let pipeline = LinkPipeline::spawn(sites);
    let outcome = LinkApplier::new(opts).drain(&pipeline.links, &pipeline.errors);
    pipeline.join()?;
    Ok(outcome)
}
