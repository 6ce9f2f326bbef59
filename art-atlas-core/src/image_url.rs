//! Classification and rewriting of media-hosting image URLs.
//!
//! The hosting service stores originals at
//! `https://upload.wikimedia.org/wikipedia/<namespace>/<h>/<hh>/<File>` and
//! serves scaled renditions at
//! `https://upload.wikimedia.org/wikipedia/<namespace>/thumb/<h>/<hh>/<File>/<width>px-<File>`.
//! `<namespace>` is `commons` for the shared repository or a language code
//! (`en`, `de`, ...) for files local to one wiki.

use std::sync::LazyLock;

use regex::Regex;

/// Base of all hosted media URLs, without a namespace.
pub const UPLOAD_BASE: &str = "https://upload.wikimedia.org/wikipedia";

/// Namespace of the shared media repository.
pub const SHARED_NAMESPACE: &str = "commons";

const THUMB_MARKER: &str = "/thumb/";

/// Size-prefixed rendition filename, e.g. `300px-Foo.jpg`, `lossy-page1-800px-Foo.tif.jpg`.
static RE_SIZE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:lossy|lossless)-)?(?:page\d+-)?\d+px-(.+)$").expect("Invalid regex")
});

/// A path prefix that ends in a namespace directory.
static RE_NAMESPACE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wikipedia/[A-Za-z0-9_-]+$").expect("Invalid regex"));

static RE_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//upload\.wikimedia\.org/wikipedia/([A-Za-z0-9_-]+)/").expect("Invalid regex")
});

/// Hosted original: a file directly under the two hash directories. Its name
/// may legitimately start with `<n>px-`.
static RE_HOSTED_ORIGINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//upload\.wikimedia\.org/wikipedia/[A-Za-z0-9_-]+/[0-9a-f]/[0-9a-f]{2}/[^/]+$")
        .expect("Invalid regex")
});

/// Canonical hosted path: namespace, optional thumb marker, two hash directories, file.
static RE_HOSTED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?:)?//upload\.wikimedia\.org/wikipedia/[A-Za-z0-9_-]+/(?:thumb/)?[0-9a-f]/[0-9a-f]{2}/[^/?#\s]+",
    )
    .expect("Invalid regex")
});

/// Split a URL into the part before any query/fragment and the rest.
fn split_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(i) => (&url[..i], &url[i..]),
        None => (url, ""),
    }
}

/// Turn a protocol-relative URL (`//host/...`) into an `https:` one.
pub fn absolutize(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}

/// Form used to de-duplicate candidates: absolute, query string and fragment removed.
pub fn normalize_url(url: &str) -> String {
    let abs = absolutize(url);
    split_suffix(&abs).0.to_string()
}

/// True if the URL points at a vector image (`.svg`/`.svgz`), in raw or
/// percent-encoded form, case-insensitively.
///
/// Rasterized renditions of vector files (`.../Logo.svg/300px-Logo.svg.png`)
/// count as vector too: they are still logos and diagrams.
pub fn is_vector_image(url: &str) -> bool {
    let mut current = url.to_lowercase();
    // Decode a couple of times to see through double encoding (%252E).
    for _ in 0..3 {
        if current.contains(".svg") {
            return true;
        }
        let decoded = match urlencoding::decode(&current) {
            Ok(d) => d.to_lowercase(),
            Err(_) => return false,
        };
        if decoded == current {
            return false;
        }
        current = decoded;
    }
    current.contains(".svg")
}

/// True if the URL addresses a scaled rendition rather than an original.
pub fn is_thumbnail_rendition(url: &str) -> bool {
    let (path, _) = split_suffix(url.trim());
    if path.contains(THUMB_MARKER) {
        return true;
    }
    !RE_HOSTED_ORIGINAL.is_match(path)
        && path
            .rsplit_once('/')
            .is_some_and(|(_, last)| RE_SIZE_PREFIX.is_match(last))
}

/// Remove every leading size marker from a rendition filename.
fn strip_size_prefixes(mut name: &str) -> &str {
    while let Some(rest) = RE_SIZE_PREFIX.captures(name).and_then(|c| c.get(1)) {
        name = rest.as_str();
    }
    name
}

/// True if the URL has the shape of a file on the media host.
pub fn is_hosted_image(url: &str) -> bool {
    RE_HOSTED_IMAGE.is_match(url.trim())
}

/// Namespace directory (`commons`, `en`, ...) of a hosted media URL.
pub fn hosting_namespace(url: &str) -> Option<&str> {
    RE_NAMESPACE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Reconstruct the original-resolution URL of a thumbnail rendition.
///
/// URLs without any thumbnail marker are returned unchanged, and so is a
/// hosted original whose filename happens to start with `<n>px-`. Returns `None`
/// for an empty URL or a thumb path with nothing after the marker.
/// Applying this to its own output returns the output unchanged.
pub fn to_original(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let absolute = absolutize(trimmed);
    let (path, _) = split_suffix(&absolute);

    if let Some(idx) = path.find(THUMB_MARKER) {
        let before = &path[..idx];
        let after = &path[idx + THUMB_MARKER.len()..];
        let original_path = match after.rsplit_once('/') {
            Some((head, last)) if RE_SIZE_PREFIX.is_match(last) => head,
            _ => after,
        };
        if original_path.is_empty() {
            return None;
        }
        let base = if RE_NAMESPACE_TAIL.is_match(before) {
            before.to_string()
        } else {
            format!("{UPLOAD_BASE}/{SHARED_NAMESPACE}")
        };
        return Some(format!("{base}/{original_path}"));
    }

    if !RE_HOSTED_ORIGINAL.is_match(path)
        && let Some((head, last)) = path.rsplit_once('/')
        && RE_SIZE_PREFIX.is_match(last)
    {
        return Some(format!("{head}/{}", strip_size_prefixes(last)));
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/image_url_tests.rs"]
mod tests;
