//! The image discovery cascade.
//!
//! Stages run in fixed order and the first acceptable candidate wins:
//!
//! 1. structured lead image (`pageimages`), original before thumbnail
//! 2. article summary images
//! 3. rendered page scan, one [`ExtractionStrategy`](crate::extract::ExtractionStrategy)
//!    at a time
//!
//! A candidate is acceptable if it is an absolute `http(s)` URL and neither
//! it nor its resolved original is a vector image. Thumbnails are always rewritten to their original. A stage
//! whose request fails counts as having found nothing.

use std::collections::HashSet;
use std::fmt;

use art_atlas_core::{
    absolutize, is_thumbnail_rendition, is_vector_image, normalize_url, to_original,
};

use crate::client::WikiApi;
use crate::error::ScrapeError;
use crate::extract::PAGE_STRATEGIES;
use crate::types::PageSummary;

/// Which stage of the cascade produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    StructuredOriginal,
    StructuredThumbnail,
    SummaryOriginal,
    SummaryThumbnail,
    /// Rendered page, with the name of the extraction strategy.
    PageScan(&'static str),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::StructuredOriginal => write!(f, "structured original"),
            ImageSource::StructuredThumbnail => write!(f, "structured thumbnail"),
            ImageSource::SummaryOriginal => write!(f, "summary original"),
            ImageSource::SummaryThumbnail => write!(f, "summary thumbnail"),
            ImageSource::PageScan(strategy) => write!(f, "page scan ({strategy})"),
        }
    }
}

/// A candidate image URL with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,
    pub is_vector: bool,
    pub is_thumbnail: bool,
}

impl ImageCandidate {
    pub fn new(url: &str) -> Self {
        let url = absolutize(url);
        Self {
            is_vector: is_vector_image(&url),
            is_thumbnail: is_thumbnail_rendition(&url),
            url,
        }
    }

    /// Original-resolution URL of this candidate. Vector images, inline
    /// `data:` placeholders and site-relative chrome are rejected.
    pub fn accept(&self) -> Option<String> {
        if self.is_vector || !is_web_url(&self.url) {
            return None;
        }
        let original = to_original(&self.url)?;
        (!is_vector_image(&original)).then_some(original)
    }
}

/// An accepted image and the stage that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedImage {
    pub url: String,
    pub source: ImageSource,
}

/// Runs the discovery cascade against a [`WikiApi`].
pub struct ImageLocator<'a, A: WikiApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: WikiApi + ?Sized> ImageLocator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Find an original, non-vector image for an article. `None` is an
    /// expected outcome, not an error.
    pub fn locate(&self, title: &str) -> Option<LocatedImage> {
        self.locate_with_summary(title, None)
    }

    /// Like [`locate`](Self::locate), reusing an already-fetched summary
    /// instead of requesting it again.
    pub fn locate_with_summary(
        &self,
        title: &str,
        summary: Option<&PageSummary>,
    ) -> Option<LocatedImage> {
        let found = self
            .structured(title)
            .or_else(|| self.from_summary(title, summary))
            .or_else(|| self.page_scan(title));
        match &found {
            Some(image) => log::debug!("Image for {title:?} from {}: {}", image.source, image.url),
            None => log::debug!("No image found for {title:?}"),
        }
        found
    }

    fn structured(&self, title: &str) -> Option<LocatedImage> {
        let image = stage_result(self.api.page_image(title), "structured image", title)?;
        first_accepted([
            (image.original.as_deref(), ImageSource::StructuredOriginal),
            (image.thumbnail.as_deref(), ImageSource::StructuredThumbnail),
        ])
    }

    fn from_summary(&self, title: &str, summary: Option<&PageSummary>) -> Option<LocatedImage> {
        let fetched;
        let summary = match summary {
            Some(s) => s,
            None => {
                fetched = stage_result(self.api.summary(title), "summary", title)?;
                &fetched
            }
        };
        first_accepted([
            (
                summary.originalimage.as_ref().map(|i| i.source.as_str()),
                ImageSource::SummaryOriginal,
            ),
            (
                summary.thumbnail.as_ref().map(|i| i.source.as_str()),
                ImageSource::SummaryThumbnail,
            ),
        ])
    }

    fn page_scan(&self, title: &str) -> Option<LocatedImage> {
        let html = stage_result(self.api.page_html(title), "rendered page", title)?;
        let mut seen = HashSet::new();
        for strategy in PAGE_STRATEGIES {
            let candidates = (strategy.extract)(&html);
            let mut fresh = 0;
            for url in candidates {
                if !seen.insert(normalize_url(&url)) {
                    continue;
                }
                fresh += 1;
                if let Some(original) = ImageCandidate::new(&url).accept() {
                    return Some(LocatedImage {
                        url: original,
                        source: ImageSource::PageScan(strategy.name),
                    });
                }
            }
            log::debug!(
                "Page strategy {} found nothing usable ({fresh} candidates)",
                strategy.name
            );
        }
        None
    }
}

fn is_web_url(url: &str) -> bool {
    let scheme = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    scheme.starts_with("https://") || scheme.starts_with("http://")
}

fn first_accepted<const N: usize>(
    candidates: [(Option<&str>, ImageSource); N],
) -> Option<LocatedImage> {
    candidates.into_iter().find_map(|(url, source)| {
        let url = ImageCandidate::new(url?).accept()?;
        Some(LocatedImage { url, source })
    })
}

/// Collapse one stage's result: network faults are logged and treated as a miss.
pub(crate) fn stage_result<T>(
    result: Result<Option<T>, ScrapeError>,
    stage: &str,
    title: &str,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{stage} lookup for {title:?} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/locator_tests.rs"]
mod tests;
