use serde::Deserialize;

/// Response from the REST `page/summary/{title}` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSummary {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<ImageRef>,
    #[serde(default)]
    pub originalimage: Option<ImageRef>,
}

/// A `{source, width, height}` image reference, as used by both APIs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRef {
    pub source: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width: None,
            height: None,
        }
    }
}

/// The page's lead image as reported by the `pageimages` query property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredImage {
    pub original: Option<String>,
    pub thumbnail: Option<String>,
}

/// `action=query` response envelope (`formatversion=2`).
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub pages: Vec<QueryPage>,
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub original: Option<ImageRef>,
    #[serde(default)]
    pub thumbnail: Option<ImageRef>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

impl QueryPage {
    pub fn structured_image(&self) -> StructuredImage {
        StructuredImage {
            original: self.original.as_ref().map(|i| i.source.clone()),
            thumbnail: self.thumbnail.as_ref().map(|i| i.source.clone()),
        }
    }

    /// Wikitext of the main slot of the first revision.
    pub fn wikitext(&self) -> Option<&str> {
        self.revisions
            .first()
            .map(|r| r.slots.main.content.as_str())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct Revision {
    pub slots: RevisionSlots,
}

#[derive(Debug, Deserialize)]
pub struct RevisionSlots {
    pub main: SlotContent,
}

#[derive(Debug, Deserialize)]
pub struct SlotContent {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: String,
}

impl QueryResponse {
    /// The first page that exists, if any.
    pub fn first_page(&self) -> Option<&QueryPage> {
        self.query
            .as_ref()
            .and_then(|q| q.pages.iter().find(|p| !p.missing))
    }

    pub fn first_search_title(&self) -> Option<&str> {
        self.query
            .as_ref()
            .and_then(|q| q.search.first())
            .map(|h| h.title.as_str())
    }
}
