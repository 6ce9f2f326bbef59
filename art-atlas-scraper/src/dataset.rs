//! Dataset driver: enrich every artwork of a `period -> [artwork]` JSON file.

use std::path::Path;
use std::time::Duration;

use art_atlas_media::atomic_write;
use serde_json::{Map, Value};

use crate::client::WikiApi;
use crate::enrich::{ArtworkEnrichment, Enricher, ImageOutcome};
use crate::error::ScrapeError;

/// Fields added to every processed artwork, in output order.
pub const ENRICHED_FIELDS: &[&str] = &[
    "wikipedia_url",
    "description",
    "location",
    "medium",
    "dimensions",
    "style",
    "significance",
    "image_filename",
];

#[derive(Debug, Clone, Default)]
pub struct DatasetOptions {
    /// Process at most this many artworks; the rest pass through unchanged.
    pub limit: Option<usize>,
    /// Pause before an artwork when the previous one used the network.
    pub request_delay: Duration,
}

/// Progress events for a dataset run.
#[derive(Debug, Clone)]
pub enum DatasetEvent {
    DatasetStarted { periods: usize, artworks: usize },
    PeriodStarted { name: String, artworks: usize },
    /// `index` is 1-based across the whole dataset.
    ArtworkStarted {
        index: usize,
        total: usize,
        label: String,
    },
    ArtworkFinished {
        index: usize,
        label: String,
        article: Option<String>,
        image: ImageOutcome,
    },
    Finished { summary: DatasetSummary },
}

/// Totals for a dataset run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub processed: usize,
    /// Artworks left untouched because of the limit.
    pub skipped: usize,
    pub articles_found: usize,
    pub images_cached: usize,
    pub images_downloaded: usize,
    pub images_missing: usize,
    pub failures: usize,
}

impl DatasetSummary {
    fn record(&mut self, result: &ArtworkEnrichment) {
        self.processed += 1;
        if result.article_title.is_some() {
            self.articles_found += 1;
        }
        match result.image {
            ImageOutcome::Cached { .. } => self.images_cached += 1,
            ImageOutcome::Downloaded { .. } => self.images_downloaded += 1,
            ImageOutcome::NotFound => self.images_missing += 1,
            ImageOutcome::Failed { .. } => self.failures += 1,
        }
    }
}

pub fn load_dataset(path: &Path) -> Result<Value, ScrapeError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write pretty-printed JSON via a temporary file and a rename.
pub fn save_dataset(path: &Path, dataset: &Value) -> Result<(), ScrapeError> {
    let mut bytes = serde_json::to_vec_pretty(dataset)?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)?;
    Ok(())
}

/// Count artworks per period, rejecting anything that is not `{name: [..]}`.
fn survey(dataset: &Value) -> Result<Vec<usize>, ScrapeError> {
    let Value::Object(periods) = dataset else {
        return Err(ScrapeError::dataset(
            "top level must be an object of period name to artwork list",
        ));
    };
    periods
        .iter()
        .map(|(name, value)| match value {
            Value::Array(items) => Ok(items.iter().filter(|i| i.is_object()).count()),
            _ => Err(ScrapeError::dataset(format!(
                "period {name:?} is not a list of artworks"
            ))),
        })
        .collect()
}

/// Enrich every artwork object in `dataset`, in document order.
///
/// Non-object entries are passed through with a warning. Per-artwork faults
/// are counted in the summary; only a malformed dataset is an error.
pub fn enrich_dataset<A, F>(
    enricher: &Enricher<'_, A>,
    mut dataset: Value,
    options: &DatasetOptions,
    mut on_event: F,
) -> Result<(Value, DatasetSummary), ScrapeError>
where
    A: WikiApi + ?Sized,
    F: FnMut(DatasetEvent),
{
    let counts = survey(&dataset)?;
    let available: usize = counts.iter().sum();
    let total = options.limit.map_or(available, |l| l.min(available));
    on_event(DatasetEvent::DatasetStarted {
        periods: counts.len(),
        artworks: total,
    });

    let mut summary = DatasetSummary::default();
    let mut index = 0;
    let mut previous_used_network = false;

    if let Value::Object(periods) = &mut dataset {
        for ((name, value), count) in periods.iter_mut().zip(counts) {
            let Value::Array(items) = value else {
                continue;
            };
            on_event(DatasetEvent::PeriodStarted {
                name: name.clone(),
                artworks: count,
            });

            for item in items.iter_mut() {
                let Value::Object(record) = item else {
                    log::warn!("Skipping non-object entry in period {name:?}");
                    continue;
                };
                if index >= total {
                    summary.skipped += 1;
                    continue;
                }
                index += 1;

                if previous_used_network && !options.request_delay.is_zero() {
                    std::thread::sleep(options.request_delay);
                }

                let artist = record.get("artist").and_then(Value::as_str);
                let title = record.get("title").and_then(Value::as_str);
                let label = artwork_label(artist, title);
                on_event(DatasetEvent::ArtworkStarted {
                    index,
                    total,
                    label: label.clone(),
                });

                let result = enricher.enrich(artist, title);
                apply_enrichment(record, &result);
                summary.record(&result);
                previous_used_network = result.used_network;

                on_event(DatasetEvent::ArtworkFinished {
                    index,
                    label,
                    article: result.article_title,
                    image: result.image,
                });
            }
        }
    }

    on_event(DatasetEvent::Finished {
        summary: summary.clone(),
    });
    Ok((dataset, summary))
}

fn artwork_label(artist: Option<&str>, title: Option<&str>) -> String {
    match (title, artist) {
        (Some(t), Some(a)) => format!("{t} by {a}"),
        (Some(t), None) => t.to_string(),
        (None, Some(a)) => format!("untitled by {a}"),
        (None, None) => "untitled".to_string(),
    }
}

/// Set the enrichment fields on a record. Existing keys keep their position.
pub fn apply_enrichment(record: &mut Map<String, Value>, result: &ArtworkEnrichment) {
    let text = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);
    let values = [
        text(&result.wikipedia_url),
        text(&result.description),
        text(&result.location),
        text(&result.medium),
        text(&result.dimensions),
        text(&result.style),
        Value::Null,
        text(&result.image_filename),
    ];
    for (field, value) in ENRICHED_FIELDS.iter().zip(values) {
        record.insert((*field).to_string(), value);
    }
}

#[cfg(test)]
#[path = "tests/dataset_tests.rs"]
mod tests;
