//! External tagging tool.
//!
//! Shells out to a tagger (MusicBrainz Picard by default) for one album
//! directory and waits for it to exit. The only thing observed afterwards is
//! whether any audio file's modification time changed, which is reported as
//! "files modified". Nothing downstream depends on the result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use crate::config::TaggerConfig;
use crate::error::{Error, Result};
use crate::model::AudioFormat;
use crate::scanner;

/// Runs a tagging pass over an album directory.
///
/// Implement this trait to substitute the subprocess in tests.
pub trait Tagger {
    /// Blocks until tagging of `album_dir` has finished.
    fn tag_album(&self, album_dir: &Path) -> Result<()>;
}

/// Tagger backed by an external program: `<program> [args..] <album_dir>`.
#[derive(Debug, Clone)]
pub struct ExternalTagger {
    program: String,
    args: Vec<String>,
}

impl ExternalTagger {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &TaggerConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Tagger for ExternalTagger {
    fn tag_album(&self, album_dir: &Path) -> Result<()> {
        tracing::info!(target: "album_archiver::tagger", program = %self.program, dir = %album_dir.display(), "Launching tagger");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(album_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::tagger(format!("Failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::tagger(format!("{} exited with {}", self.program, status)));
        }
        Ok(())
    }
}

/// Modification time of every audio file directly inside `dir`.
pub fn snapshot(dir: &Path, formats: &[AudioFormat]) -> Result<BTreeMap<PathBuf, SystemTime>> {
    let mut times = BTreeMap::new();
    for file in scanner::audio_files_in(dir, formats)? {
        let modified = std::fs::metadata(&file)?.modified()?;
        times.insert(file, modified);
    }
    Ok(times)
}

/// Runs the tagger and reports whether any audio file changed.
///
/// A file that appeared, disappeared or got a new modification time counts
/// as a change.
pub fn fingerprint_album(tagger: &dyn Tagger, dir: &Path, formats: &[AudioFormat]) -> Result<bool> {
    let before = snapshot(dir, formats)?;
    tagger.tag_album(dir)?;
    let after = snapshot(dir, formats)?;
    Ok(before != after)
}
