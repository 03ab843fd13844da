//! `dotlink` binary entry point.
use anyhow::Result;
use clap::Parser;

use dotlink::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "link");
    let log = logging::Logger::new("link");
    commands::link::run(&args, &log)
}
