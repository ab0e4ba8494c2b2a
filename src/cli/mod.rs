//! Command-line interface for album-archiver.
//!
//! Parses the input and library paths, loads configuration and hands the
//! candidates found under the input root to the archive workflow.

mod commands;

pub use commands::{Cli, run_command};
