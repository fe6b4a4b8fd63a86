//! codecat - combine a directory tree into one prompt-ready text artifact
//!
//! codecat provides:
//! - A layered omission policy (built-in defaults, the root .gitignore,
//!   custom patterns) with labeled per-entry decisions
//! - Explicit per-path include/exclude overrides with directory cascade
//! - A deterministic walk that concatenates included files behind
//!   delimiter lines, plus character and token statistics

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod engine;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    cli::run(cli)
}
