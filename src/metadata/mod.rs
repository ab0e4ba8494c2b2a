//! Album tag reading.
//!
//! Uses the lofty crate to open each container, then resolves the album
//! artist, album title and year with per-format key preferences chosen by
//! matching on [`AudioFormat`].
//!
//! Year resolution prefers the original year, then the original release date,
//! then the plain date. Dates are reduced to their leading four-digit year.

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{AlbumIdentity, AudioFormat};

/// Raw album tags as read from a track, before sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumTags {
    pub artist: String,
    pub album: String,
    pub year: String,
}

impl AlbumTags {
    pub fn into_identity(self) -> AlbumIdentity {
        AlbumIdentity::new(&self.artist, &self.album, &self.year)
    }
}

/// Source of album identities, one track at a time.
///
/// Implement this trait to substitute tag reading in tests.
pub trait AlbumIdentifier {
    fn identify(&self, track: &Path) -> Result<AlbumIdentity>;
}

/// Reads identities from embedded tags with lofty.
#[derive(Debug, Clone, Default)]
pub struct TagReader;

impl AlbumIdentifier for TagReader {
    fn identify(&self, track: &Path) -> Result<AlbumIdentity> {
        read(track).map(AlbumTags::into_identity)
    }
}

/// Read the album tags of a single track.
pub fn read(path: &Path) -> Result<AlbumTags> {
    let format = AudioFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;

    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("Failed to open file for probing: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("Failed to read file metadata: {e}")))?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .ok_or_else(|| Error::metadata(path, "no tags found"))?;

    tags_from(tag, format).map_err(|message| Error::metadata(path, message))
}

/// Resolve album tags from a generic tag, using the key order for `format`.
fn tags_from(tag: &Tag, format: AudioFormat) -> std::result::Result<AlbumTags, String> {
    let artist = tag
        .get_string(&ItemKey::AlbumArtist)
        .map(str::to_string)
        .or_else(|| tag.artist().map(|s| s.to_string()))
        .filter(|s| !s.trim().is_empty())
        .ok_or("missing artist tag")?;

    let album = tag
        .album()
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
        .ok_or("missing album tag")?;

    let year = year_keys(format)
        .iter()
        .find_map(|key| tag.get_string(key).and_then(parse_year))
        .ok_or("missing year tag")?;

    Ok(AlbumTags {
        artist,
        album,
        year,
    })
}

/// Keys consulted for the year, most preferred first.
fn year_keys(format: AudioFormat) -> Vec<ItemKey> {
    match format {
        AudioFormat::Flac | AudioFormat::Ogg => vec![
            ItemKey::Unknown("ORIGINALYEAR".to_string()),
            ItemKey::OriginalReleaseDate,
            ItemKey::RecordingDate,
            ItemKey::Year,
        ],
        AudioFormat::Mp3 => vec![
            ItemKey::Unknown("TORY".to_string()),
            ItemKey::OriginalReleaseDate,
            ItemKey::RecordingDate,
            ItemKey::Year,
        ],
        AudioFormat::M4a => vec![
            ItemKey::OriginalReleaseDate,
            ItemKey::RecordingDate,
            ItemKey::Year,
        ],
    }
}

/// Leading four-digit year of a date-like value, e.g. `1997-05-21` -> `1997`.
///
/// Values without a leading year are returned trimmed as they are.
fn parse_year(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let head: String = value.chars().take(4).collect();
    let rest = &value[head.len()..];
    if head.len() == 4
        && head.chars().all(|c| c.is_ascii_digit())
        && !rest.starts_with(|c: char| c.is_ascii_digit())
    {
        Some(head)
    } else {
        Some(value.to_string())
    }
}
