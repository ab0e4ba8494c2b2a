//! Archive and list commands.

use anyhow::Context;
use chrono::{DateTime, Local};
use std::path::Path;

use crate::config::Config;
use crate::metadata::TagReader;
use crate::prompt::{DefaultAnswer, TerminalPrompt};
use crate::scanner;
use crate::tagger::ExternalTagger;
use crate::workflow::Archiver;

/// Interactively archive every candidate under `input` into `library`.
pub fn cmd_archive(input: &Path, library: &Path, config: &Config) -> anyhow::Result<()> {
    let formats = config.formats();
    let candidates = scanner::list_album_directories(input, &formats)
        .with_context(|| format!("Failed to scan {}", input.display()))?;

    println!(
        "Found {} album director{} in {}",
        candidates.len(),
        if candidates.len() == 1 { "y" } else { "ies" },
        input.display()
    );
    println!("Library: {}", library.display());

    let identifier = TagReader;
    let tagger = ExternalTagger::from_config(&config.tagger);
    let prompt = TerminalPrompt::stdio(DefaultAnswer::No);

    let mut archiver = Archiver::new(library, formats, &identifier, prompt);
    if config.tagger.enabled {
        tracing::info!(target: "album_archiver::cli", program = tagger.program(), "Tagging pass enabled");
        archiver = archiver.with_tagger(&tagger);
    }

    let summary = archiver.run(&candidates);

    tracing::info!(target: "album_archiver::cli", ?summary, "Run finished");
    println!("\nCompleted: {}", summary);
    Ok(())
}

/// Print candidate album directories in the order they would be offered.
pub fn cmd_list(input: &Path, config: &Config) -> anyhow::Result<()> {
    let candidates = scanner::list_album_directories(input, &config.formats())
        .with_context(|| format!("Failed to scan {}", input.display()))?;

    for candidate in &candidates {
        let modified: DateTime<Local> = candidate.last_modified.into();
        println!(
            "{}  {}",
            modified.format("%Y-%m-%d %H:%M"),
            candidate.path.display()
        );
    }
    println!("{} album directories", candidates.len());
    Ok(())
}
