//! Album Archiver - files new album downloads into an organized library.
//!
//! Each album directory found under the input root is identified from its
//! tags, matched against existing copies in the library and, after the
//! operator confirms, moved to `{library}/{artist}/{artist} - {album} ({year})`.

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod prompt;
pub mod scanner;
pub mod tagger;
#[cfg(test)]
pub mod test_utils;
pub mod workflow;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Missing or malformed flags print usage and exit non-zero
    let args = cli::Cli::parse();

    let default_level = if args.verbose { "album_archiver=debug" } else { "album_archiver=info" };

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();

    cli::run_command(&args)
}
