//! CLI argument definitions and dispatch.
//!
//! - `archive`: the interactive archive run (default)
//! - `list`: print candidate album directories in processing order

mod archive;

use clap::Parser;
use std::path::PathBuf;

use crate::config::{self, Config};

pub use archive::{cmd_archive, cmd_list};

/// Album Archiver CLI
///
/// Files freshly downloaded album directories into an organized
/// `{library}/{artist}/{artist} - {album} ({year})` tree.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for new album directories
    #[arg(short, long = "input", value_name = "DIR")]
    pub input: PathBuf,

    /// Root of the organized library
    #[arg(short, long = "output", value_name = "DIR")]
    pub output: PathBuf,

    /// Configuration file (defaults to the OS config directory)
    #[arg(long, value_name = "FILE", env = "ALBUM_ARCHIVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the external tagging pass
    #[arg(long)]
    pub no_tagger: bool,

    /// Tagging program to run instead of the configured one
    #[arg(long, value_name = "PROGRAM")]
    pub tagger: Option<String>,

    /// Only list candidate album directories, most recent first
    #[arg(long)]
    pub list: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub save_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Loaded configuration with command-line overrides applied.
    pub fn effective_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        if self.no_tagger {
            config.tagger.enabled = false;
        }
        if let Some(program) = &self.tagger {
            config.tagger.program = program.clone();
        }
        config
    }
}

/// Run the command selected by the flags.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.effective_config();

    if cli.save_config {
        match &cli.config {
            Some(path) => config::save_to(&config, path)?,
            None => config::save(&config)?,
        }
        println!("Configuration saved.");
        return Ok(());
    }

    if cli.list {
        return cmd_list(&cli.input, &config);
    }

    cmd_archive(&cli.input, &cli.output, &config)
}
