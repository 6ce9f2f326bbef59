use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label substituted for a missing or blank artist/title.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maximum length of a sanitized component and of a full cache key, in characters.
pub const MAX_KEY_LEN: usize = 200;

/// Characters that are not allowed in filenames on common filesystems.
static RE_FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static RE_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("Invalid regex"));

/// The textual identity of an artwork, as read from the source catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtworkIdentity {
    pub artist: String,
    pub title: String,
}

impl ArtworkIdentity {
    /// Build an identity, substituting [`UNKNOWN_LABEL`] for missing or blank fields.
    pub fn new(artist: Option<&str>, title: Option<&str>) -> Self {
        Self {
            artist: label_or_unknown(artist),
            title: label_or_unknown(title),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(&self.artist, &self.title)
    }
}

impl fmt::Display for ArtworkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

fn label_or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Filesystem-safe identifier for an artwork's stored image.
///
/// Never contains any of `<>:"/\|?*` or whitespace, never starts or ends
/// with `_`, and is at most [`MAX_KEY_LEN`] characters long. May be empty
/// when both inputs sanitize to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key as `sanitize(artist) + "_" + sanitize(title)`.
    ///
    /// The joined key goes through the same underscore collapse, trim and
    /// length cap as each component, so an empty side does not leave a dangling
    /// separator and the whole key stays within [`MAX_KEY_LEN`].
    pub fn derive(artist: &str, title: &str) -> Self {
        let joined = format!(
            "{}_{}",
            sanitize_component(artist),
            sanitize_component(title)
        );
        Self(finish(&joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File name for this key with the given extension (without the leading dot).
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension.trim_start_matches('.'))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sanitize one component of a cache key.
///
/// Strips forbidden filename characters, turns whitespace runs into a single
/// underscore, collapses repeated underscores, trims underscores from both
/// ends and caps the result at [`MAX_KEY_LEN`] characters.
pub fn sanitize_component(text: &str) -> String {
    let stripped = RE_FORBIDDEN_CHARS.replace_all(text, "");
    let underscored = RE_WHITESPACE.replace_all(&stripped, "_");
    finish(&underscored)
}

fn finish(text: &str) -> String {
    let collapsed = RE_UNDERSCORES.replace_all(text, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.chars().count() <= MAX_KEY_LEN {
        return trimmed.to_string();
    }
    let capped: String = trimmed.chars().take(MAX_KEY_LEN).collect();
    capped.trim_end_matches('_').to_string()
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
