//! Canonical album labels.
//!
//! A label has the fixed shape `{artist} - {title} ({year})` and is used both
//! as the destination directory name and as the basis for library matching.

use std::fmt;

/// Characters that cannot appear in a directory segment on target filesystems.
const UNSAFE_CHARS: [char; 2] = ['/', ':'];

/// Formatted album label. Only produced by [`format`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalLabel(String);

impl CanonicalLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Replaces path-unsafe characters with `-`. Everything else is kept.
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Builds the canonical label for an album.
pub fn format(artist: &str, title: &str, year: &str) -> CanonicalLabel {
    CanonicalLabel(format!(
        "{} - {} ({})",
        sanitize_component(artist),
        sanitize_component(title),
        year
    ))
}
