//! Artwork infobox fields from raw wikitext.

use std::sync::LazyLock;

use regex::Regex;

const LOCATION_FIELDS: &[&str] = &["location", "museum", "collection", "repository"];
const DIMENSION_FIELDS: &[&str] = &["dimensions", "size", "height"];

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(?:[^\]|]*\|)?([^\]|]*)\]\]").expect("Invalid regex")
});

/// Innermost template; applied repeatedly to remove nested ones.
static RE_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("Invalid regex"));

static RE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<ref\b[^>/]*/>|<ref\b[^>]*>.*?</ref>").expect("Invalid regex")
});

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Fields read from an artwork's infobox. Absent or empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoboxFields {
    pub location: Option<String>,
    pub dimensions: Option<String>,
    pub medium: Option<String>,
    pub style: Option<String>,
    pub movement: Option<String>,
}

impl InfoboxFields {
    /// `style`, falling back to `movement`.
    pub fn style_or_movement(&self) -> Option<&str> {
        self.style.as_deref().or(self.movement.as_deref())
    }
}

pub fn parse_infobox(wikitext: &str) -> InfoboxFields {
    InfoboxFields {
        location: first_field(wikitext, LOCATION_FIELDS),
        dimensions: first_field(wikitext, DIMENSION_FIELDS),
        medium: field(wikitext, "medium"),
        style: field(wikitext, "style"),
        movement: field(wikitext, "movement"),
    }
}

fn first_field(wikitext: &str, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| field(wikitext, name))
}

/// First non-empty `| name = value` in the text, cleaned.
pub fn field(wikitext: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?i)\|\s*{}\s*=([^\n]*)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures_iter(wikitext)
        .filter_map(|c| c.get(1))
        .map(|m| clean_value(cut_at_separator(m.as_str())))
        .find(|v| !v.is_empty())
}

/// The value up to the next `|` that is not inside `[[...]]` or `{{...}}`.
fn cut_at_separator(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' | b'{' if bytes.get(i + 1) == Some(&bytes[i]) => {
                depth += 1;
                i += 2;
                continue;
            }
            b']' | b'}' if depth > 0 && bytes.get(i + 1) == Some(&bytes[i]) => {
                depth -= 1;
                i += 2;
                continue;
            }
            b'|' if depth == 0 => return &raw[..i],
            _ => {}
        }
        i += 1;
    }
    raw
}

/// Strip wiki markup: links become their label, templates, refs and tags go.
pub fn clean_value(raw: &str) -> String {
    let mut text = RE_REF.replace_all(raw, "").into_owned();
    loop {
        let next = RE_TEMPLATE.replace_all(&text, "").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    let text = RE_LINK.replace_all(&text, "$1");
    let text = RE_TAG.replace_all(&text, " ");
    let text = text.replace("'''", "").replace("''", "");
    RE_SPACES.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
#[path = "tests/infobox_tests.rs"]
mod tests;
