//! Scripted in-memory [`WikiApi`] for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::client::WikiApi;
use crate::error::ScrapeError;
use crate::types::{ImageRef, PageSummary, StructuredImage};

#[derive(Default)]
pub(crate) struct FakeWiki {
    summaries: HashMap<String, PageSummary>,
    images: HashMap<String, StructuredImage>,
    html: HashMap<String, String>,
    search: HashMap<String, String>,
    wikitext: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    failing: HashSet<&'static str>,
    requests: RefCell<Vec<String>>,
}

impl FakeWiki {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_summary(mut self, title: &str, extract: &str, thumbnail: Option<&str>) -> Self {
        self.summaries.insert(
            title.to_string(),
            PageSummary {
                title: Some(title.to_string()),
                extract: Some(extract.to_string()),
                thumbnail: thumbnail.map(ImageRef::new),
                originalimage: None,
            },
        );
        self
    }

    pub(crate) fn with_page_image(
        mut self,
        title: &str,
        original: Option<&str>,
        thumbnail: Option<&str>,
    ) -> Self {
        self.images.insert(
            title.to_string(),
            StructuredImage {
                original: original.map(str::to_string),
                thumbnail: thumbnail.map(str::to_string),
            },
        );
        self
    }

    pub(crate) fn with_html(mut self, title: &str, html: &str) -> Self {
        self.html.insert(title.to_string(), html.to_string());
        self
    }

    pub(crate) fn with_search(mut self, query: &str, title: &str) -> Self {
        self.search.insert(query.to_string(), title.to_string());
        self
    }

    pub(crate) fn with_wikitext(mut self, title: &str, text: &str) -> Self {
        self.wikitext.insert(title.to_string(), text.to_string());
        self
    }

    pub(crate) fn with_file(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), bytes);
        self
    }

    /// Make every call to `endpoint` fail with a server error.
    pub(crate) fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub(crate) fn count(&self, endpoint: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.split_once(' ').is_some_and(|(e, _)| e == endpoint))
            .count()
    }

    fn record(&self, endpoint: &'static str, arg: &str) -> Result<(), ScrapeError> {
        self.requests.borrow_mut().push(format!("{endpoint} {arg}"));
        if self.failing.contains(endpoint) {
            return Err(ScrapeError::ServerError {
                status: 503,
                url: format!("fake://{endpoint}/{arg}"),
            });
        }
        Ok(())
    }
}

impl WikiApi for FakeWiki {
    fn summary(&self, title: &str) -> Result<Option<PageSummary>, ScrapeError> {
        self.record("summary", title)?;
        Ok(self.summaries.get(title).cloned())
    }

    fn page_image(&self, title: &str) -> Result<Option<StructuredImage>, ScrapeError> {
        self.record("page_image", title)?;
        Ok(self.images.get(title).cloned())
    }

    fn page_html(&self, title: &str) -> Result<Option<String>, ScrapeError> {
        self.record("page_html", title)?;
        Ok(self.html.get(title).cloned())
    }

    fn search(&self, query: &str) -> Result<Option<String>, ScrapeError> {
        self.record("search", query)?;
        Ok(self.search.get(query).cloned())
    }

    fn wikitext(&self, title: &str) -> Result<Option<String>, ScrapeError> {
        self.record("wikitext", title)?;
        Ok(self.wikitext.get(title).cloned())
    }

    fn download(&self, url: &str, limit: u64) -> Result<Vec<u8>, ScrapeError> {
        self.record("download", url)?;
        match self.files.get(url) {
            Some(bytes) if bytes.len() as u64 > limit => Err(ScrapeError::TooLarge {
                url: url.to_string(),
                limit,
            }),
            Some(bytes) => Ok(bytes.clone()),
            None => Err(ScrapeError::ServerError {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
