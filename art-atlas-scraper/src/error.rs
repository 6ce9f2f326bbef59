use art_atlas_media::MediaError;

/// Errors that can occur while talking to the encyclopedia or enriching records.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by the encyclopedia API")]
    RateLimit,

    #[error("Server error (HTTP {status}): {url}")]
    ServerError { status: u16, url: String },

    #[error("Download exceeds {limit} bytes: {url}")]
    TooLarge { url: String, limit: u64 },

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl ScrapeError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }
}
