//! Test utilities and fixtures for album-archiver tests.
//!
//! Provides filesystem builders for album and library trees, plus scripted
//! stand-ins for the operator, the tag reader and the external tagger.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{ScriptedPrompt, create_album};
//!
//! #[test]
//! fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     create_album(&dir.path().join("album"), &["01.flac"]);
//!     let mut prompt = ScriptedPrompt::new(&[true, false]);
//!     // ... test logic
//! }
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::metadata::AlbumIdentifier;
use crate::model::{AlbumIdentity, CandidateAlbumDir, LibraryEntry};
use crate::prompt::Confirm;
use crate::tagger::Tagger;

/// Creates `dir` (and parents) holding empty files with the given names.
pub fn create_album(dir: &Path, files: &[&str]) {
    fs::create_dir_all(dir).expect("Failed to create album directory");
    for name in files {
        File::create(dir.join(name)).expect("Failed to create file");
    }
}

/// Sets a file's modification time to `secs` seconds after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("Failed to open file for touching");
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .expect("Failed to set modification time");
}

/// A library entry for an existing directory, named after its last segment.
pub fn library_entry(dir: &Path) -> LibraryEntry {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    LibraryEntry {
        normalized_core: name.clone(),
        name,
        path: dir.to_path_buf(),
    }
}

/// A candidate for `dir` stamped with the current time.
pub fn candidate(dir: &Path) -> CandidateAlbumDir {
    CandidateAlbumDir {
        path: dir.to_path_buf(),
        last_modified: SystemTime::now(),
    }
}

/// Answers questions from a fixed script, then says no.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            questions: Vec::new(),
        }
    }

    /// Every question asked so far, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Confirm for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Identifies every track as the same album, or always fails.
pub struct StubIdentifier {
    identity: Option<AlbumIdentity>,
}

impl StubIdentifier {
    pub fn new(identity: AlbumIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn failing() -> Self {
        Self { identity: None }
    }
}

impl AlbumIdentifier for StubIdentifier {
    fn identify(&self, track: &Path) -> Result<AlbumIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| Error::metadata(track, "missing album tag"))
    }
}

/// Records tagger invocations and optionally touches a file or fails.
#[derive(Debug, Default)]
pub struct StubTagger {
    touch: Option<(String, u64)>,
    fail: bool,
    calls: RefCell<Vec<PathBuf>>,
}

impl StubTagger {
    /// Sets the mtime of `file` inside the album directory when run.
    pub fn touching(file: &str, secs: u64) -> Self {
        Self {
            touch: Some((file.to_string(), secs)),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl Tagger for StubTagger {
    fn tag_album(&self, album_dir: &Path) -> Result<()> {
        self.calls.borrow_mut().push(album_dir.to_path_buf());
        if self.fail {
            return Err(Error::tagger("stub tagger failure"));
        }
        if let Some((file, secs)) = &self.touch {
            set_mtime(&album_dir.join(file), *secs);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_album_and_set_mtime() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("a").join("b");
        create_album(&album, &["01.flac"]);
        set_mtime(&album.join("01.flac"), 42);

        let modified = fs::metadata(album.join("01.flac")).unwrap().modified().unwrap();
        assert_eq!(modified, UNIX_EPOCH + Duration::from_secs(42));
    }

    #[test]
    fn test_scripted_prompt_runs_out_to_no() {
        let mut prompt = ScriptedPrompt::new(&[true]);
        assert!(prompt.confirm("first"));
        assert!(!prompt.confirm("second"));
        assert_eq!(prompt.questions(), ["first", "second"]);
    }

    #[test]
    fn test_library_entry_name() {
        let entry = library_entry(Path::new("/lib/alpha/alpha - beta"));
        assert_eq!(entry.name, "alpha - beta");
    }
}
