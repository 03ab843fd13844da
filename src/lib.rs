//! Symlink manifests into place.
//!
//! `dotlink` walks a dotfiles tree for `links.json` manifests, resolves every
//! entry into a [`resources::link::Link`] and creates (or previews) the
//! symlinks, then prints a grouped report.
//!
//! - **[`discovery`]** finds manifest sites under a root
//! - **[`config`]** decodes manifests and resolves `$VAR` paths
//! - **[`pipeline`]** fans sites out over a worker pool and applies links from
//!   a single consumer
//! - **[`report`]** renders the outcome
//! - **[`commands`]** wires it together behind the CLI
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod resources;
