//! Per-artwork enrichment: article lookup, infobox text fields and the
//! cached, size-bounded image.

use art_atlas_core::{ArtworkIdentity, CacheKey, normalize_url};
use art_atlas_media::{
    CANONICAL_EXTENSION, ImageStore, MediaError, StoredImage, TranscodeBudget, transcode,
};

use crate::client::{DEFAULT_PAGE_BASE, WikiApi, article_url};
use crate::infobox::parse_infobox;
use crate::locator::{ImageLocator, ImageSource, stage_result};
use crate::types::PageSummary;

/// Relative directory recorded in `image_filename` values.
pub const DEFAULT_IMAGE_DIR: &str = "images";

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Skip text lookups; an artwork with a stored image then needs no requests.
    pub images_only: bool,
    /// Directory name prefixed to stored file names in `image_filename`.
    pub image_dir: String,
    pub page_base: String,
    pub max_download_bytes: u64,
    pub budget: TranscodeBudget,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            images_only: false,
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            page_base: DEFAULT_PAGE_BASE.to_string(),
            max_download_bytes: 64 * 1024 * 1024,
            budget: TranscodeBudget::default(),
        }
    }
}

/// An article matched to an artwork title.
#[derive(Debug, Clone)]
pub struct ResolvedArticle {
    pub title: String,
    /// Present when the title was found directly rather than via search.
    pub summary: Option<PageSummary>,
}

/// What happened to an artwork's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Already in the store; nothing was fetched.
    Cached { file_name: String },
    Downloaded {
        url: String,
        source: ImageSource,
        file_name: String,
        byte_size: u64,
        /// False when the bytes could not be decoded and were kept as-is.
        transcoded: bool,
    },
    NotFound,
    Failed { message: String },
}

impl ImageOutcome {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ImageOutcome::Cached { file_name } | ImageOutcome::Downloaded { file_name, .. } => {
                Some(file_name)
            }
            ImageOutcome::NotFound | ImageOutcome::Failed { .. } => None,
        }
    }
}

/// Fields produced for one artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkEnrichment {
    pub key: CacheKey,
    pub article_title: Option<String>,
    pub wikipedia_url: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub style: Option<String>,
    /// `<image_dir>/<key>.<ext>`, when an image is stored.
    pub image_filename: Option<String>,
    pub image: ImageOutcome,
    /// Whether any request was sent for this artwork.
    pub used_network: bool,
}

impl ArtworkEnrichment {
    fn empty(key: CacheKey) -> Self {
        Self {
            key,
            article_title: None,
            wikipedia_url: None,
            description: None,
            location: None,
            medium: None,
            dimensions: None,
            style: None,
            image_filename: None,
            image: ImageOutcome::NotFound,
            used_network: false,
        }
    }
}

/// Enriches artworks one at a time against an encyclopedia and an image store.
pub struct Enricher<'a, A: WikiApi + ?Sized> {
    api: &'a A,
    store: &'a dyn ImageStore,
    options: EnrichOptions,
}

impl<'a, A: WikiApi + ?Sized> Enricher<'a, A> {
    pub fn new(api: &'a A, store: &'a dyn ImageStore, options: EnrichOptions) -> Self {
        Self {
            api,
            store,
            options,
        }
    }

    pub fn options(&self) -> &EnrichOptions {
        &self.options
    }

    /// Find the article for an artwork title: the title itself if it has a
    /// summary, otherwise the top full-text search hit.
    pub fn resolve_article(&self, query: &str) -> Option<ResolvedArticle> {
        match self.api.summary(query) {
            Ok(Some(summary)) => {
                return Some(ResolvedArticle {
                    title: query.to_string(),
                    summary: Some(summary),
                });
            }
            Ok(None) => log::debug!("No article titled {query:?}, searching"),
            Err(e) => {
                log::warn!("Summary lookup for {query:?} failed: {e}");
                return None;
            }
        }
        let title = stage_result(self.api.search(query), "search", query)?;
        Some(ResolvedArticle {
            title,
            summary: None,
        })
    }

    /// Enrich one artwork. Never fails: every fault is scoped to the returned
    /// [`ImageOutcome`] or leaves text fields empty.
    pub fn enrich(&self, artist: Option<&str>, title: Option<&str>) -> ArtworkEnrichment {
        let identity = ArtworkIdentity::new(artist, title);
        let key = identity.cache_key();
        let cached = self.store.exists(&key);
        let mut out = ArtworkEnrichment::empty(key.clone());

        let needs_article = !(self.options.images_only && cached.is_some());
        let query = title.map(str::trim).filter(|t| !t.is_empty());
        let mut article = match query {
            Some(q) if needs_article => {
                out.used_network = true;
                self.resolve_article(q)
            }
            _ => None,
        };

        match &article {
            Some(a) => log::info!("Found article {:?} for {identity}", a.title),
            None if needs_article => log::warn!("No article found for {identity}"),
            None => {}
        }

        if !self.options.images_only
            && let Some(article) = article.as_mut()
        {
            self.apply_text_fields(article, &mut out);
        }
        out.article_title = article.as_ref().map(|a| a.title.clone());

        out.image = match (cached, &article) {
            (Some(ext), _) => {
                log::info!("Image already stored: {}", key.file_name(ext));
                ImageOutcome::Cached {
                    file_name: key.file_name(ext),
                }
            }
            (None, Some(article)) => self.fetch_image(&key, article),
            (None, None) => ImageOutcome::NotFound,
        };
        out.image_filename = out
            .image
            .file_name()
            .map(|f| format!("{}/{f}", self.options.image_dir.trim_end_matches('/')));
        out
    }

    fn apply_text_fields(&self, article: &mut ResolvedArticle, out: &mut ArtworkEnrichment) {
        if article.summary.is_none() {
            article.summary =
                stage_result(self.api.summary(&article.title), "summary", &article.title);
        }
        let Some(summary) = &article.summary else {
            return;
        };

        out.wikipedia_url = Some(article_url(&self.options.page_base, &article.title));
        out.description = summary.extract.clone();

        let wikitext = stage_result(self.api.wikitext(&article.title), "wikitext", &article.title);
        if let Some(text) = wikitext {
            let fields = parse_infobox(&text);
            out.style = fields.style_or_movement().map(str::to_string);
            out.location = fields.location;
            out.medium = fields.medium;
            out.dimensions = fields.dimensions;
        }
    }

    fn fetch_image(&self, key: &CacheKey, article: &ResolvedArticle) -> ImageOutcome {
        let locator = ImageLocator::new(self.api);
        let Some(located) = locator.locate_with_summary(&article.title, article.summary.as_ref())
        else {
            log::warn!("No image found for article {:?}", article.title);
            return ImageOutcome::NotFound;
        };

        let bytes = match self.api.download(&located.url, self.options.max_download_bytes) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to download {}: {e}", located.url);
                return ImageOutcome::Failed {
                    message: format!("download failed: {e}"),
                };
            }
        };

        match self.store_image(key, &located.url, &bytes) {
            Ok((stored, transcoded)) => {
                log::info!(
                    "Stored {} ({} -> {} bytes)",
                    stored.file_name(),
                    bytes.len(),
                    stored.byte_size
                );
                ImageOutcome::Downloaded {
                    file_name: stored.file_name(),
                    url: located.url,
                    source: located.source,
                    byte_size: stored.byte_size,
                    transcoded,
                }
            }
            Err(e) => {
                log::warn!("Failed to store image for {key}: {e}");
                ImageOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Transcode and store downloaded bytes. Undecodable input is stored raw
    /// under an extension guessed from the URL; the flag reports which happened.
    pub fn store_image(
        &self,
        key: &CacheKey,
        url: &str,
        bytes: &[u8],
    ) -> Result<(StoredImage, bool), MediaError> {
        match transcode(bytes, &self.options.budget) {
            Ok(out) => {
                if !out.within_budget {
                    log::warn!(
                        "{key}: still {} bytes after {} attempts (budget {})",
                        out.bytes.len(),
                        out.attempts,
                        self.options.budget.max_bytes
                    );
                }
                let stored = self
                    .store
                    .write_atomically(key, CANONICAL_EXTENSION, &out.bytes)?;
                Ok((stored, true))
            }
            Err(e) if e.is_decode() => {
                let extension = guess_extension(url);
                log::warn!("{key}: {e}; keeping the original bytes as .{extension}");
                Ok((self.store.write_atomically(key, extension, bytes)?, false))
            }
            Err(e) => Err(e),
        }
    }
}

/// File extension implied by an image URL, defaulting to `jpg`.
pub fn guess_extension(url: &str) -> &'static str {
    let path = normalize_url(url).to_ascii_lowercase();
    if path.contains(".png") {
        "png"
    } else if path.contains(".webp") {
        "webp"
    } else if path.contains(".gif") {
        "gif"
    } else {
        "jpg"
    }
}

#[cfg(test)]
#[path = "tests/enrich_tests.rs"]
mod tests;
