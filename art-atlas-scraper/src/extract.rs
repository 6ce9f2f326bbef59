//! Image URL extraction from rendered article HTML.
//!
//! Each strategy is a pure function from markup to candidate URLs, in
//! document order. Candidates are absolutized but otherwise raw: the locator
//! is responsible for de-duplication, vector filtering and thumbnail
//! resolution.

use std::sync::LazyLock;

use art_atlas_core::{
    SHARED_NAMESPACE, absolutize, hosting_namespace, is_hosted_image, is_thumbnail_rendition,
    normalize_url,
};
use regex::Regex;

/// A named page-scan strategy.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    pub extract: fn(&str) -> Vec<String>,
}

/// Page-scan strategies in the order the locator tries them.
pub const PAGE_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy {
        name: "infobox",
        extract: infobox_images,
    },
    ExtractionStrategy {
        name: "content",
        extract: content_images,
    },
    ExtractionStrategy {
        name: "hosted-link",
        extract: hosted_links,
    },
    ExtractionStrategy {
        name: "lazy",
        extract: lazy_images,
    },
];

static RE_INFOBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<table\b[^>]*\bclass\s*=\s*["'][^"']*\binfobox\b[^"']*["'][^>]*>(.*?)</table>"#)
        .expect("Invalid regex")
});

static RE_IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("Invalid regex")
});

/// Start of the main article body in the classic skin.
static RE_CONTENT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div\b[^>]*(?:\bid\s*=\s*["']mw-content-text["']|\bclass\s*=\s*["'][^"']*\bmw-parser-output\b)[^>]*>"#,
    )
    .expect("Invalid regex")
});

/// Parsoid output has no wrapper div; the body is the content.
static RE_BODY_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>").expect("Invalid regex"));

static RE_HOSTED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:https?:)?//upload\.wikimedia\.org/wikipedia/[A-Za-z0-9_-]+/(?:thumb/)?[0-9a-f]/[0-9a-f]{2}/[^"'\s<>?#]+"#,
    )
    .expect("Invalid regex")
});

static RE_LAZY_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bdata-(?:lazy-)?src\s*=\s*["']([^"']+)["']"#).expect("Invalid regex")
});

fn clean(raw: &str) -> String {
    absolutize(&raw.replace("&amp;", "&"))
}

fn img_sources(markup: &str) -> impl Iterator<Item = String> + '_ {
    RE_IMG_SRC.captures_iter(markup).map(|c| clean(&c[1]))
}

/// `<img>` sources inside infobox tables.
pub fn infobox_images(html: &str) -> Vec<String> {
    RE_INFOBOX
        .captures_iter(html)
        .flat_map(|c| img_sources(c.get(1).map_or("", |m| m.as_str())))
        .collect()
}

/// Hosted-domain `<img>` sources inside the main content area.
pub fn content_images(html: &str) -> Vec<String> {
    let Some(start) = RE_CONTENT_START
        .find(html)
        .or_else(|| RE_BODY_START.find(html))
    else {
        return Vec::new();
    };
    img_sources(&html[start.end()..])
        .filter(|url| is_hosted_image(url))
        .collect()
}

/// Hosted image URLs anywhere in the page, originals before thumbnails and
/// shared-namespace files before wiki-local ones.
pub fn hosted_links(html: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut links: Vec<String> = RE_HOSTED_LINK
        .find_iter(html)
        .map(|m| clean(m.as_str()))
        .filter(|url| seen.insert(normalize_url(url)))
        .collect();
    // Stable: document order is kept within each rank
    links.sort_by_key(|url| {
        (
            is_thumbnail_rendition(url),
            hosting_namespace(url) != Some(SHARED_NAMESPACE),
        )
    });
    links
}

/// Lazily loaded images (`data-src`, `data-lazy-src`).
pub fn lazy_images(html: &str) -> Vec<String> {
    RE_LAZY_SRC
        .captures_iter(html)
        .map(|c| clean(&c[1]))
        .collect()
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
