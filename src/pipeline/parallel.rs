//! Rayon-based fan-out of manifest sites onto two rendezvous channels.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use rayon::prelude::*;

use super::{Item, LinkSource, fan_in};
use crate::error::{PipelineError, SiteError};
use crate::resources::link::Link;

/// A running fan-out over manifest sites.
///
/// Every site is processed by one task on the Rayon pool. Links and site
/// errors arrive on two unbuffered channels; a send blocks until the consumer
/// takes the value. Both channels close only after every task has returned.
#[derive(Debug)]
pub struct LinkPipeline {
    /// Resolved links, in manifest order within each site.
    pub links: Receiver<Link>,
    /// One error per site that could not be read or decoded.
    pub errors: Receiver<SiteError>,
    driver: JoinHandle<()>,
}

impl LinkPipeline {
    /// Start processing `sites` in the background.
    ///
    /// The caller must drain both [`links`](Self::links) and
    /// [`errors`](Self::errors) until they are closed, then call
    /// [`join`](Self::join).
    #[must_use]
    pub fn spawn<S>(sites: Vec<S>) -> Self
    where
        S: LinkSource + Send + 'static,
    {
        let (link_tx, links) = bounded(0);
        let (error_tx, errors) = bounded(0);

        // `for_each_with` hands every task its own sender clones and only
        // returns once all tasks are done, so the channels cannot close early.
        let driver = thread::spawn(move || {
            let total = sites.len();
            sites
                .into_par_iter()
                .for_each_with((link_tx, error_tx), |(link_tx, error_tx), site| {
                    emit(&site, link_tx, error_tx);
                });
            tracing::debug!(sites = total, "pipeline finished");
        });

        Self {
            links,
            errors,
            driver,
        }
    }

    /// Wait for the driver thread.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::WorkerPanicked`] if any site task panicked.
    pub fn join(self) -> Result<(), PipelineError> {
        self.driver
            .join()
            .map_err(|_| PipelineError::WorkerPanicked)
    }

    /// Drain both streams into vectors and join.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::WorkerPanicked`] if any site task panicked.
    pub fn collect(self) -> Result<(Vec<Link>, Vec<SiteError>), PipelineError> {
        let mut links = Vec::new();
        let mut errors = Vec::new();
        fan_in(&self.links, &self.errors, |item| match item {
            Item::Link(link) => links.push(link),
            Item::Error(e) => errors.push(e),
        });
        self.join()?;
        Ok((links, errors))
    }
}

/// Resolve one site and send its result.
///
/// A failed site sends exactly one error. A successful site sends its links
/// in order. If the consumer has gone away the remaining values are dropped.
fn emit<S: LinkSource>(site: &S, links: &Sender<Link>, errors: &Sender<SiteError>) {
    match site.links() {
        Ok(resolved) => {
            for link in resolved {
                if links.send(link).is_err() {
                    tracing::debug!("link stream closed, dropping remaining links");
                    return;
                }
            }
        }
        Err(e) => {
            if errors.send(e).is_err() {
                tracing::debug!("error stream closed, dropping site error");
            }
        }
    }
}
