//! The archive workflow.
//!
//! Each candidate album directory goes through these states, one candidate
//! at a time:
//!
//! ```text
//! Discovered -> (Skip | FingerprintCheck) -> Identified -> Matched
//!            -> (Confirmed | Declined) -> Merged
//! ```
//!
//! Every decision is asked through [`Confirm`]. Failures are confined to the
//! candidate they happen in; the run moves on to the next one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};
use crate::library;
use crate::metadata::AlbumIdentifier;
use crate::model::{AudioFormat, CandidateAlbumDir};
use crate::organizer::{self, MergeReport, ReconciliationPlanner};
use crate::prompt::Confirm;
use crate::scanner;
use crate::tagger::{self, Tagger};

/// How processing of one candidate ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Files were moved into the library
    Merged(MergeReport),
    /// The operator rejected the proposed destination; nothing moved
    Declined { destination: PathBuf },
    /// Left in place for a future run
    Skipped,
    /// The operator had the source directory removed
    Deleted,
    /// Tags could not produce an album identity
    Unidentified(String),
    /// A filesystem operation failed part way
    Failed(String),
    /// The operator ended the run
    Stopped,
}

/// Counts of outcomes across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub merged: usize,
    pub declined: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub unidentified: usize,
    pub failed: usize,
    pub stopped: bool,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Merged(_) => self.merged += 1,
            Outcome::Declined { .. } => self.declined += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Deleted => self.deleted += 1,
            Outcome::Unidentified(_) => self.unidentified += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Stopped => self.stopped = true,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} archived, {} declined, {} skipped, {} deleted, {} unidentified, {} errors",
            self.merged, self.declined, self.skipped, self.deleted, self.unidentified, self.failed
        )?;
        if self.stopped {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}

/// Drives candidates through the archive workflow.
pub struct Archiver<'a, P: Confirm> {
    library_root: PathBuf,
    formats: Vec<AudioFormat>,
    identifier: &'a dyn AlbumIdentifier,
    tagger: Option<&'a dyn Tagger>,
    prompt: P,
}

impl<'a, P: Confirm> Archiver<'a, P> {
    pub fn new(
        library_root: impl Into<PathBuf>,
        formats: Vec<AudioFormat>,
        identifier: &'a dyn AlbumIdentifier,
        prompt: P,
    ) -> Self {
        Self {
            library_root: library_root.into(),
            formats,
            identifier,
            tagger: None,
            prompt,
        }
    }

    /// Run `tagger` on every accepted candidate before identifying it.
    pub fn with_tagger(mut self, tagger: &'a dyn Tagger) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Processes candidates in order until done or the operator stops.
    pub fn run(&mut self, candidates: &[CandidateAlbumDir]) -> RunSummary {
        let mut summary = RunSummary::default();
        for candidate in candidates {
            let outcome = self.process(candidate);
            summary.record(&outcome);
            if outcome == Outcome::Stopped {
                tracing::info!(target: "album_archiver::workflow", "Stopped by operator");
                break;
            }
        }
        summary
    }

    /// Takes one candidate from `Discovered` to a terminal outcome.
    pub fn process(&mut self, candidate: &CandidateAlbumDir) -> Outcome {
        let dir = candidate.path.as_path();
        if !dir.is_dir() {
            // removed along with an enclosing candidate earlier in the run
            tracing::info!(target: "album_archiver::workflow", dir = %dir.display(), "Candidate no longer exists");
            println!("Skipping '{}': it no longer exists", dir.display());
            return Outcome::Skipped;
        }

        let question = format!("Would you like to archive album directory '{}'?", dir.display());
        if !self.prompt.confirm(&question) {
            return self.handle_rejected(dir);
        }

        println!("Processing {}", dir.display());
        self.fingerprint(dir);

        match self.reconcile(dir) {
            Ok(outcome) => outcome,
            Err(e) if e.is_identification_failure() => {
                tracing::warn!(target: "album_archiver::workflow", dir = %dir.display(), error = %e, "Could not identify album");
                println!("Could not identify album in '{}': {}", dir.display(), e);
                Outcome::Unidentified(e.to_string())
            }
            Err(e) => {
                tracing::error!(target: "album_archiver::workflow", dir = %dir.display(), error = %e, "Archiving failed");
                println!("ERROR archiving '{}': {}", dir.display(), e);
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Declined at `Discovered`: stop, delete outright, or leave for later.
    fn handle_rejected(&mut self, dir: &Path) -> Outcome {
        if self.prompt.confirm("Would you like to stop?") {
            return Outcome::Stopped;
        }

        let nested = self.nested_albums(dir);
        for album in &nested {
            println!("  contains album directory: {}", album.display());
        }
        let question = if nested.is_empty() {
            format!("Delete '{}' and everything in it permanently?", dir.display())
        } else {
            format!(
                "Delete '{}' and everything in it, including {} other album director{}, permanently?",
                dir.display(),
                nested.len(),
                if nested.len() == 1 { "y" } else { "ies" }
            )
        };
        if !self.prompt.confirm(&question) {
            return Outcome::Skipped;
        }

        match fs::remove_dir_all(dir) {
            Ok(()) => {
                tracing::info!(target: "album_archiver::workflow", dir = %dir.display(), "Deleted candidate directory");
                Outcome::Deleted
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Outcome::Deleted,
            Err(e) => {
                tracing::error!(target: "album_archiver::workflow", dir = %dir.display(), error = %e, "Failed to delete directory");
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Album directories below `dir`, which a recursive delete would take too.
    fn nested_albums(&self, dir: &Path) -> Vec<PathBuf> {
        match scanner::list_album_directories(dir, &self.formats) {
            Ok(albums) => albums
                .into_iter()
                .map(|a| a.path)
                .filter(|p| p != dir)
                .collect(),
            Err(e) => {
                tracing::warn!(target: "album_archiver::workflow", dir = %dir.display(), error = %e, "Could not list nested albums");
                Vec::new()
            }
        }
    }

    /// Informational only; tagger problems never block the merge.
    fn fingerprint(&self, dir: &Path) {
        let Some(tagger) = self.tagger else {
            return;
        };
        match tagger::fingerprint_album(tagger, dir, &self.formats) {
            Ok(true) => println!("Files modified."),
            Ok(false) => println!("Files not modified."),
            Err(e) => {
                tracing::warn!(target: "album_archiver::workflow", dir = %dir.display(), error = %e, "Tagging pass failed, continuing")
            }
        }
    }

    /// `Identified` through `Merged`.
    fn reconcile(&mut self, dir: &Path) -> Result<Outcome> {
        let track = scanner::representative_track(dir, &self.formats)
            .map_err(|_| Error::metadata(dir, "no audio file left to identify"))?;
        let identity = self
            .identifier
            .identify(&track)
            .with_context(format!("identifying {}", dir.display()))?;
        let label = identity.label();
        let destination = identity.destination(&self.library_root);
        tracing::info!(
            target: "album_archiver::workflow",
            artist = identity.artist(),
            title = identity.title(),
            year = identity.year(),
            label = %label,
            "Identified album"
        );

        let matches = library::find_existing_entries(&self.library_root, identity.artist(), &label)?;
        for entry in &matches {
            println!("Found existing copy: {}", entry.path.display());
        }

        let question = format!(
            "Would you like to move '{}' to '{}'?",
            dir.display(),
            destination.display()
        );
        if !self.prompt.confirm(&question) {
            return Ok(Outcome::Declined { destination });
        }

        let planner = ReconciliationPlanner::new(&self.formats);
        let sets = planner.plan(&matches)?;
        let approved = planner.review(sets, &mut self.prompt);

        let report = organizer::merge(dir, &destination, &approved)?;
        println!(
            "Moved {} file(s) to '{}'",
            report.moved.len(),
            report.destination.display()
        );
        tracing::info!(
            target: "album_archiver::workflow",
            destination = %report.destination.display(),
            moved = report.moved.len(),
            deleted = report.deleted,
            "Merged album"
        );
        Ok(Outcome::Merged(report))
    }
}
