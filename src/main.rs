use anyhow::Result;
use clap::Parser;
use new_packs::cli::{Command, RootArgs};
use new_packs::workflow::{run_filter, run_scan};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NEW_PACKS_LOG";

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.command.common().verbose);

    match args.command {
        Command::Scan(args) => run_scan(args),
        Command::Filter(args) => run_filter(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
