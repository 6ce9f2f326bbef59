//! Encyclopedia access and the artwork enrichment pipeline.
//!
//! [`WikiApi`] abstracts the handful of encyclopedia endpoints used here;
//! [`WikipediaClient`] is the blocking HTTP implementation. On top of it,
//! [`ImageLocator`] runs the image discovery cascade and [`Enricher`]
//! resolves, downloads, transcodes and stores one artwork at a time.

pub mod client;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod infobox;
pub mod locator;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpSettings, WikiApi, WikipediaClient, article_url, encode_title};
pub use dataset::{
    DatasetEvent, DatasetOptions, DatasetSummary, enrich_dataset, load_dataset, save_dataset,
};
pub use enrich::{ArtworkEnrichment, EnrichOptions, Enricher, ImageOutcome, ResolvedArticle};
pub use error::ScrapeError;
pub use extract::{ExtractionStrategy, PAGE_STRATEGIES};
pub use infobox::{InfoboxFields, parse_infobox};
pub use locator::{ImageCandidate, ImageLocator, ImageSource, LocatedImage};
pub use types::{ImageRef, PageSummary, StructuredImage};
