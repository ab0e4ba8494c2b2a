//! Merging albums into the library.
//!
//! Moves a candidate album directory into `{root}/{artist}/{label}/` after
//! clearing any approved duplicate files from older copies.
//!
//! # Features
//! - Canonical album labels ([`label`])
//! - Review of stale duplicates before anything is deleted ([`planner`])
//! - Idempotent deletes and moves, so an interrupted merge can be re-run
//! - Cross-device moves via a staged copy + delete
//! - Existing files are never overwritten

pub mod label;
pub mod planner;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result, ResultExt};
use crate::model::DeletionSet;

pub use label::CanonicalLabel;
pub use planner::ReconciliationPlanner;

/// What a merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub destination: PathBuf,
    /// Final paths of the moved files
    pub moved: Vec<PathBuf>,
    /// Number of old files removed from matched entries
    pub deleted: usize,
}

/// Merges `source` into `destination`.
///
/// Creates the destination if needed, clears the approved deletion sets,
/// then moves every file directly inside `source`. Subdirectories of the
/// source stay where they are; they are candidates of their own.
pub fn merge(source: &Path, destination: &Path, approved: &[DeletionSet]) -> Result<MergeReport> {
    fs::create_dir_all(destination)
        .with_context(format!("creating {}", destination.display()))?;

    let deleted = execute_deletions(approved, destination)?;
    let moved = move_files(source, destination)?;

    if remove_dir_if_empty(source)? {
        tracing::debug!(target: "album_archiver::organizer", dir = %source.display(), "Removed emptied source directory");
    }

    Ok(MergeReport {
        destination: destination.to_path_buf(),
        moved,
        deleted,
    })
}

/// Deletes every file in the approved sets.
///
/// Entries left without any files are pruned, except the destination
/// itself. Returns the number of files actually removed.
pub fn execute_deletions(sets: &[DeletionSet], destination: &Path) -> Result<usize> {
    let mut deleted = 0;
    for set in sets {
        for file in &set.files {
            if delete_file(file)? {
                deleted += 1;
            }
        }
        if set.entry.path != destination {
            prune_empty_dirs(&set.entry.path)?;
        }
        tracing::info!(target: "album_archiver::organizer", entry = %set.entry.path.display(), files = set.files.len(), "Cleared old copy");
    }
    Ok(deleted)
}

/// Removes a file. A file that is already gone counts as done.
///
/// Returns `true` if this call removed it.
pub fn delete_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(target: "album_archiver::organizer", file = %path.display(), "Already deleted");
            Ok(false)
        }
        Err(e) => Err(Error::Io(e).context(format!("deleting {}", path.display()))),
    }
}

/// Moves every regular file directly inside `source` into `destination`.
pub fn move_files(source: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(source)
        .with_context(format!("reading {}", source.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    files.sort();

    let mut moved = Vec::with_capacity(files.len());
    for file in files {
        if let Some(target) = move_file(&file, destination)? {
            moved.push(target);
        }
    }
    Ok(moved)
}

/// Moves one file into `dest_dir`, keeping its name when that is free.
///
/// Returns `None` when the source no longer exists, which happens when a
/// previous run was interrupted after moving it.
pub fn move_file(source: &Path, dest_dir: &Path) -> Result<Option<PathBuf>> {
    if !source.exists() {
        tracing::debug!(target: "album_archiver::organizer", file = %source.display(), "Source already moved");
        return Ok(None);
    }
    let file_name = source
        .file_name()
        .ok_or_else(|| Error::merge(format!("no file name in {}", source.display())))?;
    let target = free_path(dest_dir, Path::new(file_name));

    match fs::rename(source, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => copy_then_remove(source, &target)?,
        Err(e) => {
            return Err(Error::Io(e).context(format!(
                "moving {} to {}",
                source.display(),
                target.display()
            )));
        }
    }

    tracing::debug!(target: "album_archiver::organizer", from = %source.display(), to = %target.display(), "Moved");
    Ok(Some(target))
}

/// Cross-device move.
///
/// The copy is written under a staging name next to `target` and renamed into
/// place once complete. On any failure the source is kept and nothing is left
/// under `target`, so a retry starts from the same state.
fn copy_then_remove(source: &Path, target: &Path) -> Result<()> {
    let staging = staging_path(target);

    if let Err(e) = fs::copy(source, &staging).and_then(|_| fs::rename(&staging, target)) {
        discard(&staging);
        return Err(Error::Io(e).context(format!(
            "copying {} to {}",
            source.display(),
            target.display()
        )));
    }

    if let Err(e) = fs::remove_file(source) {
        discard(target);
        return Err(Error::Io(e).context(format!("removing source file {}", source.display())));
    }
    Ok(())
}

/// `dir/.name.part`, the in-progress name of a cross-device copy.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.part"))
}

/// Best-effort removal of a copy that must not survive a failed move.
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != ErrorKind::NotFound
    {
        tracing::warn!(target: "album_archiver::organizer", file = %path.display(), error = %e, "Could not remove incomplete copy");
    }
}

/// `dir/name`, or `dir/stem (n).ext` with the first free `n` if taken.
fn free_path(dir: &Path, name: &Path) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Removes `dir` if it exists and is empty.
fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    if dir.is_dir() && fs::read_dir(dir)?.next().is_none() {
        fs::remove_dir(dir)?;
        return Ok(true);
    }
    Ok(false)
}

/// Removes empty directories under and including `root`, deepest first.
fn prune_empty_dirs(root: &Path) -> Result<()> {
    for entry in WalkDir::new(root).contents_first(true).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            remove_dir_if_empty(entry.path())?;
        }
    }
    Ok(())
}
