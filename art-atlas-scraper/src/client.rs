use std::io::Read;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::types::{PageSummary, QueryResponse, StructuredImage};

pub const DEFAULT_API_BASE: &str = "https://en.wikipedia.org";
pub const DEFAULT_PAGE_BASE: &str = "https://en.wikipedia.org/wiki";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "art-atlas/",
    env!("CARGO_PKG_VERSION"),
    " (artwork dataset enrichment)"
);

/// Width requested for the `pageimages` thumbnail, used when no original is reported.
const PAGE_IMAGE_THUMB_SIZE: &str = "2000";

/// HTTP behaviour of the encyclopedia client and the enrichment driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pause between artworks that hit the network.
    pub request_delay_ms: u64,
    pub max_download_bytes: u64,
    /// Host serving `/api/rest_v1` and `/w/api.php`.
    pub api_base: String,
    /// Prefix of human-readable article URLs.
    pub page_base: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay_ms: 500,
            max_download_bytes: 64 * 1024 * 1024,
            api_base: DEFAULT_API_BASE.to_string(),
            page_base: DEFAULT_PAGE_BASE.to_string(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// The encyclopedia endpoints the enrichment pipeline consumes.
///
/// Lookups return `Ok(None)` when the service answers "not found";
/// `Err` is reserved for transport failures and unexpected statuses.
pub trait WikiApi {
    /// Article summary (`extract` and lead image references).
    fn summary(&self, title: &str) -> Result<Option<PageSummary>, ScrapeError>;

    /// The article's structured lead image (`pageimages`).
    fn page_image(&self, title: &str) -> Result<Option<StructuredImage>, ScrapeError>;

    /// Rendered article HTML.
    fn page_html(&self, title: &str) -> Result<Option<String>, ScrapeError>;

    /// Title of the best full-text search hit.
    fn search(&self, query: &str) -> Result<Option<String>, ScrapeError>;

    /// Raw wikitext of the current revision.
    fn wikitext(&self, title: &str) -> Result<Option<String>, ScrapeError>;

    /// Fetch a URL's body, failing once more than `limit` bytes arrive.
    fn download(&self, url: &str, limit: u64) -> Result<Vec<u8>, ScrapeError>;
}

/// Blocking HTTP client for the Wikipedia REST and Action APIs.
pub struct WikipediaClient {
    http: Client,
    api_base: String,
}

impl WikipediaClient {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn rest_url(&self, endpoint: &str, title: &str) -> String {
        format!(
            "{}/api/rest_v1/page/{endpoint}/{}",
            self.api_base,
            encode_title(title)
        )
    }

    pub(crate) fn action_url(&self) -> String {
        format!("{}/w/api.php", self.api_base)
    }

    /// Send a request and return the body, or `None` on 404.
    fn fetch_text(&self, request: RequestBuilder) -> Result<Option<String>, ScrapeError> {
        let resp = request.send()?;
        match check_status(resp.status(), resp.url().as_str())? {
            false => Ok(None),
            true => Ok(Some(resp.text()?)),
        }
    }

    fn query(&self, params: &[(&str, &str)]) -> Result<QueryResponse, ScrapeError> {
        let request = self
            .http
            .get(self.action_url())
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params);
        let Some(text) = self.fetch_text(request)? else {
            return Ok(QueryResponse { query: None });
        };
        serde_json::from_str(&text).map_err(|e| {
            ScrapeError::api(format!(
                "Failed to parse query response: {e}. Response: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}

impl WikiApi for WikipediaClient {
    fn summary(&self, title: &str) -> Result<Option<PageSummary>, ScrapeError> {
        let url = self.rest_url("summary", title);
        log::debug!("GET {url}");
        let Some(text) = self.fetch_text(self.http.get(&url))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn page_image(&self, title: &str) -> Result<Option<StructuredImage>, ScrapeError> {
        log::debug!("pageimages query for {title:?}");
        let resp = self.query(&[
            ("prop", "pageimages"),
            ("titles", title),
            ("piprop", "original|thumbnail"),
            ("pithumbsize", PAGE_IMAGE_THUMB_SIZE),
        ])?;
        Ok(resp
            .first_page()
            .map(|p| p.structured_image())
            .filter(|img| img.original.is_some() || img.thumbnail.is_some()))
    }

    fn page_html(&self, title: &str) -> Result<Option<String>, ScrapeError> {
        let url = self.rest_url("html", title);
        log::debug!("GET {url}");
        self.fetch_text(self.http.get(&url))
    }

    fn search(&self, query: &str) -> Result<Option<String>, ScrapeError> {
        log::debug!("search query for {query:?}");
        let resp = self.query(&[("list", "search"), ("srsearch", query), ("srlimit", "1")])?;
        Ok(resp.first_search_title().map(str::to_string))
    }

    fn wikitext(&self, title: &str) -> Result<Option<String>, ScrapeError> {
        log::debug!("revisions query for {title:?}");
        let resp = self.query(&[
            ("prop", "revisions"),
            ("titles", title),
            ("rvprop", "content"),
            ("rvslots", "main"),
        ])?;
        Ok(resp
            .first_page()
            .and_then(|p| p.wikitext())
            .map(str::to_string))
    }

    fn download(&self, url: &str, limit: u64) -> Result<Vec<u8>, ScrapeError> {
        log::debug!("Downloading {url}");
        let resp = self.http.get(url).send()?;
        if !check_status(resp.status(), url)? {
            return Err(ScrapeError::ServerError {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: url.to_string(),
            });
        }
        let too_large = || ScrapeError::TooLarge {
            url: url.to_string(),
            limit,
        };
        if resp.content_length().is_some_and(|len| len > limit) {
            return Err(too_large());
        }

        // Read at most one byte past the limit so oversize bodies are detected
        // without buffering them whole.
        let mut bytes = Vec::new();
        resp.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
        if bytes.len() as u64 > limit {
            return Err(too_large());
        }
        Ok(bytes)
    }
}

/// `Ok(true)` on success, `Ok(false)` on 404, `Err` on any other status.
fn check_status(status: StatusCode, url: &str) -> Result<bool, ScrapeError> {
    if status.is_success() {
        return Ok(true);
    }
    match status {
        StatusCode::NOT_FOUND => Ok(false),
        StatusCode::TOO_MANY_REQUESTS => Err(ScrapeError::RateLimit),
        _ => Err(ScrapeError::ServerError {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}

/// Article title as a REST path segment: spaces become underscores, the rest
/// is percent-encoded.
pub fn encode_title(title: &str) -> String {
    urlencoding::encode(&title.trim().replace(' ', "_")).into_owned()
}

/// Human-readable URL of an article.
pub fn article_url(page_base: &str, title: &str) -> String {
    format!("{}/{}", page_base.trim_end_matches('/'), encode_title(title))
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
