//! Library matching.
//!
//! Finds directories under `{root}/{artist}/` that hold the same album as a
//! new canonical label, even when they were named by hand or by an older
//! convention. Both sides are reduced to a *normalized core*:
//!
//! - the first occurrence of the artist token is removed, ignoring case
//! - leftover spaces, hyphens and underscores are trimmed from both ends
//! - a trailing year group such as `(1999)` is dropped
//!
//! Cores are then compared with exact, case-sensitive equality, so
//! `Artist - Album`, `artist-Album (1999)` and `Album` all match
//! `Artist - Album (1999)`, while `Artist - Album Live` does not. Other
//! parentheticals are part of the title: `Album (Deluxe)` only matches
//! `Album (Deluxe)`, with or without its year.

use std::fs;
use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::model::LibraryEntry;
use crate::organizer::label::CanonicalLabel;

/// Characters trimmed from a name after the artist token is removed.
const SEPARATORS: [char; 3] = [' ', '-', '_'];

/// Find existing library directories holding the same album as `label`.
///
/// A missing artist directory is a normal first-time case and yields an
/// empty list. Results are sorted by directory name.
pub fn find_existing_entries(
    library_root: &Path,
    artist: &str,
    label: &CanonicalLabel,
) -> Result<Vec<LibraryEntry>> {
    let artist_dir = library_root.join(artist);
    if !artist_dir.is_dir() {
        tracing::debug!(target: "album_archiver::library", dir = %artist_dir.display(), "No artist directory yet");
        return Ok(Vec::new());
    }

    let target = target_core(artist, label.as_str());

    let mut matches = Vec::new();
    for entry in fs::read_dir(&artist_dir)
        .with_context(format!("reading artist directory {}", artist_dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let core = entry_core(artist, &name);
        if core == target {
            matches.push(LibraryEntry {
                name,
                path: entry.path(),
                normalized_core: core,
            });
        }
    }

    matches.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        target: "album_archiver::library",
        artist,
        core = %target,
        matches = matches.len(),
        "Matched library entries"
    );
    Ok(matches)
}

/// Normalized core of a new album label.
pub fn target_core(artist: &str, label: &str) -> String {
    let prefix = format!("{artist} - ");
    let title = label.strip_prefix(prefix.as_str()).unwrap_or(label);
    strip_year_suffix(title).trim().to_string()
}

/// Normalized core of an existing directory name.
pub fn entry_core(artist: &str, name: &str) -> String {
    let without_artist = remove_case_insensitive(name, artist);
    let trimmed = without_artist.trim_matches(&SEPARATORS[..]);
    strip_year_suffix(trimmed).trim().to_string()
}

/// Drops one trailing `(digits)` group, if the string ends with one.
fn strip_year_suffix(s: &str) -> &str {
    let trimmed = s.trim_end();
    let Some(inner) = trimmed.strip_suffix(')') else {
        return s;
    };
    match inner.rfind('(') {
        Some(open) if inner[open + 1..].chars().all(|c| c.is_ascii_digit()) => &trimmed[..open],
        _ => s,
    }
}

/// Removes the first occurrence of `needle` from `haystack`, ignoring case.
fn remove_case_insensitive(haystack: &str, needle: &str) -> String {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return haystack.to_string();
    }

    for (idx, _) in haystack.char_indices() {
        if let Some(len) = matched_prefix_len(&haystack[idx..], &needle) {
            return format!("{}{}", &haystack[..idx], &haystack[idx + len..]);
        }
    }
    haystack.to_string()
}

/// Byte length of the prefix of `s` equal to the lowercased `needle`.
fn matched_prefix_len(s: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (idx, c) in s.char_indices() {
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(idx + c.len_utf8());
        }
    }
    None
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::organizer::label;
    use proptest::prelude::*;

    fn word() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-z][a-z ]{0,15}[a-z]").unwrap()
    }

    proptest! {
        /// A label always matches the directory it would be filed under
        #[test]
        fn label_matches_own_directory(artist in word(), title in word(), year in "[0-9]{4}") {
            let label = label::format(&artist, &title, &year);
            prop_assert_eq!(
                entry_core(&artist, label.as_str()),
                target_core(&artist, label.as_str())
            );
        }

        /// Upper-casing the artist token in a directory name does not change its core
        #[test]
        fn artist_case_is_ignored(artist in word(), title in word()) {
            let lower = format!("{artist} - {title}");
            let upper = format!("{} - {title}", artist.to_uppercase());
            prop_assert_eq!(entry_core(&artist, &lower), entry_core(&artist, &upper));
        }

        /// The year group never affects the core, even after a title parenthetical
        #[test]
        fn year_group_is_ignored(
            artist in word(),
            base in word(),
            extra in prop::option::of(word()),
            year in "[0-9]{4}",
        ) {
            let title = match extra {
                Some(extra) => format!("{base} ({extra})"),
                None => base,
            };
            let with_year = format!("{artist} - {title} ({year})");
            let without = format!("{artist} - {title}");
            prop_assert_eq!(entry_core(&artist, &with_year), entry_core(&artist, &without));
        }
    }
}
