//! Reconciliation planning.
//!
//! Given the library entries that hold the same album as an incoming one,
//! decides which of their audio files may be cleared before the merge.
//! Nothing is deleted without an explicit yes from the operator.

use std::path::PathBuf;
use walkdir::WalkDir;

use crate::error::Result;
use crate::model::{AudioFormat, DeletionSet, LibraryEntry};
use crate::prompt::Confirm;
use crate::scanner::is_audio_file;

/// Builds and reviews deletion sets for matched library entries.
#[derive(Debug, Clone)]
pub struct ReconciliationPlanner<'a> {
    formats: &'a [AudioFormat],
}

impl<'a> ReconciliationPlanner<'a> {
    pub fn new(formats: &'a [AudioFormat]) -> Self {
        Self { formats }
    }

    /// One deletion set per entry that still holds audio.
    ///
    /// Entries without any supported audio files are left out entirely.
    pub fn plan(&self, entries: &[LibraryEntry]) -> Result<Vec<DeletionSet>> {
        let mut sets = Vec::new();
        for entry in entries {
            let files = self.audio_files(entry)?;
            if files.is_empty() {
                tracing::debug!(target: "album_archiver::planner", entry = %entry.path.display(), "No audio in matched entry, skipping");
                continue;
            }
            sets.push(DeletionSet {
                entry: entry.clone(),
                files,
            });
        }
        Ok(sets)
    }

    /// Shows each set to the operator and keeps only the approved ones.
    ///
    /// A declined set is left on disk untouched.
    pub fn review(&self, sets: Vec<DeletionSet>, prompt: &mut dyn Confirm) -> Vec<DeletionSet> {
        let mut approved = Vec::new();
        for set in sets {
            println!(
                "Existing copy '{}' holds {} audio file(s):",
                set.entry.path.display(),
                set.files.len()
            );
            for file in &set.files {
                println!("  {}", file.display());
            }

            let question = format!("Delete these files from '{}'?", set.entry.name);
            if prompt.confirm(&question) {
                tracing::info!(target: "album_archiver::planner", entry = %set.entry.path.display(), files = set.files.len(), "Deletion approved");
                approved.push(set);
            } else {
                tracing::info!(target: "album_archiver::planner", entry = %set.entry.path.display(), "Deletion declined, keeping old files");
            }
        }
        approved
    }

    fn audio_files(&self, entry: &LibraryEntry) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for item in WalkDir::new(&entry.path).min_depth(1) {
            let item = item.map_err(std::io::Error::from)?;
            if item.file_type().is_file() && is_audio_file(item.path(), self.formats) {
                files.push(item.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}
