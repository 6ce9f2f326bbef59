use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be read or written
    #[error("Config error: {0}")]
    Config(String),

    /// Encyclopedia or dataset failure
    #[error(transparent)]
    Scrape(#[from] art_atlas_scraper::ScrapeError),

    /// Image transcoding or storage failure
    #[error(transparent)]
    Media(#[from] art_atlas_media::MediaError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
