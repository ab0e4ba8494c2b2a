//! Core data models for album reconciliation.
//!
//! Defines the entities that flow through an archive run:
//! [`AudioFormat`], [`AlbumIdentity`], [`CandidateAlbumDir`],
//! [`LibraryEntry`] and [`DeletionSet`].
//!
//! Nothing here is persisted. Every run rebuilds these values from the
//! filesystem.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::organizer::label::{self, CanonicalLabel};

/// Audio container formats the archiver knows how to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AudioFormat {
    Flac,
    Mp3,
    M4a,
    Ogg,
}

impl AudioFormat {
    /// Every supported format, in default configuration order.
    pub const ALL: [AudioFormat; 4] = [Self::Flac, Self::Mp3, Self::M4a, Self::Ogg];

    /// Parse a bare extension (without the dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// Determine the format of a file from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical lowercase extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Album identity derived from one representative track.
///
/// `artist` and `title` are stored sanitized, so they are safe to use as
/// path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumIdentity {
    artist: String,
    title: String,
    year: String,
}

impl AlbumIdentity {
    pub fn new(artist: &str, title: &str, year: &str) -> Self {
        Self {
            artist: label::sanitize_component(artist),
            title: label::sanitize_component(title),
            year: year.to_string(),
        }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    /// The canonical label for this album.
    pub fn label(&self) -> CanonicalLabel {
        label::format(&self.artist, &self.title, &self.year)
    }

    /// Destination directory under the library root:
    /// `{root}/{artist}/{label}`.
    pub fn destination(&self, library_root: &Path) -> PathBuf {
        library_root
            .join(&self.artist)
            .join(self.label().as_str())
    }
}

/// A source-side directory holding one or more supported audio files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAlbumDir {
    pub path: PathBuf,
    /// Most recent modification time of the audio files inside.
    /// Only used to order candidates for presentation.
    pub last_modified: SystemTime,
}

/// An existing album directory under `{root}/{artist}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Raw directory name
    pub name: String,
    pub path: PathBuf,
    /// Name with the artist token and trailing parenthetical removed
    pub normalized_core: String,
}

/// The audio files inside one matched library entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionSet {
    pub entry: LibraryEntry,
    pub files: Vec<PathBuf>,
}
