//! Candidate album discovery.
//!
//! Walks the input root and collects every directory that directly holds at
//! least one supported audio file. Results are ordered so the most recently
//! touched album comes first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::{AudioFormat, CandidateAlbumDir};

/// Check if a path has one of the given audio extensions.
pub fn is_audio_file(path: &Path, formats: &[AudioFormat]) -> bool {
    AudioFormat::from_path(path).is_some_and(|f| formats.contains(&f))
}

/// Scans `root` recursively for album directories.
///
/// A directory qualifies the first time an audio file is seen inside it and
/// is never listed twice. The result is sorted by the newest audio file
/// modification time, descending, with the path as tie-breaker.
pub fn list_album_directories(
    root: &Path,
    formats: &[AudioFormat],
) -> Result<Vec<CandidateAlbumDir>> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    tracing::info!(target: "album_archiver::scanner", root = %root.display(), "Scanning for album directories");

    let mut newest: HashMap<PathBuf, SystemTime> = HashMap::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_audio_file(entry.path(), formats) {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        newest
            .entry(parent.to_path_buf())
            .and_modify(|t| *t = (*t).max(modified))
            .or_insert(modified);
    }

    let mut albums: Vec<CandidateAlbumDir> = newest
        .into_iter()
        .map(|(path, last_modified)| CandidateAlbumDir {
            path,
            last_modified,
        })
        .collect();

    albums.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.path.cmp(&b.path))
    });

    tracing::debug!(target: "album_archiver::scanner", count = albums.len(), "Scan complete");
    Ok(albums)
}

/// Audio files directly inside `dir`, sorted by path.
pub fn audio_files_in(dir: &Path, formats: &[AudioFormat]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_audio_file(p, formats))
        .collect();
    files.sort();
    Ok(files)
}

/// The track used to identify an album: the first audio file by name.
pub fn representative_track(dir: &Path, formats: &[AudioFormat]) -> Result<PathBuf> {
    audio_files_in(dir, formats)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_album, set_mtime};
    use std::fs::File;
    use tempfile::tempdir;

    const FORMATS: &[AudioFormat] = &AudioFormat::ALL;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a.mp3"), FORMATS));
        assert!(is_audio_file(Path::new("UPPER.OGG"), FORMATS));
        assert!(!is_audio_file(Path::new("track.wav"), FORMATS));
        assert!(!is_audio_file(Path::new("a.mp3"), &[AudioFormat::Flac]));
    }

    #[test]
    fn test_lists_only_directories_with_audio() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        create_album(&root.join("one"), &["01.flac", "02.flac", "cover.jpg"]);
        create_album(&root.join("two").join("CD1"), &["01.MP3"]);
        create_album(&root.join("docs"), &["notes.txt"]);
        File::create(root.join("loose.ogg")).unwrap();

        let albums = list_album_directories(root, FORMATS).unwrap();
        let mut paths: Vec<PathBuf> = albums.into_iter().map(|a| a.path).collect();
        paths.sort();

        assert_eq!(
            paths,
            vec![
                root.to_path_buf(),
                root.join("one"),
                root.join("two").join("CD1"),
            ]
        );
    }

    #[test]
    fn test_orders_by_newest_file_descending() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        create_album(&root.join("old"), &["a.flac"]);
        create_album(&root.join("new"), &["a.flac", "b.flac"]);
        create_album(&root.join("mid"), &["a.m4a"]);

        set_mtime(&root.join("old").join("a.flac"), 1_000);
        set_mtime(&root.join("new").join("a.flac"), 1_000);
        set_mtime(&root.join("new").join("b.flac"), 3_000);
        set_mtime(&root.join("mid").join("a.m4a"), 2_000);

        let names: Vec<String> = list_album_directories(root, FORMATS)
            .unwrap()
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_rescan_is_deterministic_and_unique() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        for name in ["a", "b", "c"] {
            create_album(&root.join(name), &["1.flac", "2.flac", "3.mp3"]);
            for track in ["1.flac", "2.flac", "3.mp3"] {
                set_mtime(&root.join(name).join(track), 5_000);
            }
        }

        let first = list_album_directories(root, FORMATS).unwrap();
        let second = list_album_directories(root, FORMATS).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        // equal timestamps fall back to path order
        assert_eq!(first[0].path, root.join("a"));
        assert_eq!(first[2].path, root.join("c"));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let result = list_album_directories(Path::new("/nonexistent/input"), FORMATS);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_representative_track_is_first_by_name() {
        let dir = tempdir().unwrap();
        create_album(dir.path(), &["b.mp3", "a.flac", "0.txt"]);

        let track = representative_track(dir.path(), FORMATS).unwrap();
        assert_eq!(track, dir.path().join("a.flac"));
    }

    #[test]
    fn test_representative_track_without_audio() {
        let dir = tempdir().unwrap();
        create_album(dir.path(), &["cover.jpg"]);
        assert!(representative_track(dir.path(), FORMATS).is_err());
    }
}
