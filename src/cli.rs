//! Command-line interface definition.
use clap::Parser;
use std::path::PathBuf;

/// Command-line entry point: link every `links.json` manifest under a root.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dotlink",
    about = "Discover links.json manifests and apply their symlinks",
    version
)]
pub struct Cli {
    /// The dotfiles source (defaults to $DOT, else ../)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Only print out the changes
    #[arg(long)]
    pub dry: bool,

    /// Overwrite existing links
    #[arg(long)]
    pub force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
