//! Batch resizer: shrink already-stored images that are over budget.

use std::fs;
use std::path::{Path, PathBuf};

use crate::MediaError;
use crate::store::{RECOGNIZED_EXTENSIONS, atomic_write};
use crate::transcode::{TranscodeBudget, transcode};

/// Progress events emitted while resizing a directory.
#[derive(Debug, Clone)]
pub enum ResizeEvent {
    /// Directory scan finished.
    Scanned { total: usize },
    /// File is within budget and was left alone.
    WithinBudget { path: PathBuf, size: u64 },
    /// File is over budget but this is a dry run.
    WouldResize { path: PathBuf, size: u64 },
    /// File was replaced with a smaller transcode.
    Resized {
        path: PathBuf,
        before: u64,
        after: u64,
        quality: u8,
    },
    /// Transcoding did not make the file smaller; original kept.
    Unchanged { path: PathBuf, size: u64 },
    /// File could not be processed.
    Failed { path: PathBuf, message: String },
}

/// Totals for a resize run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeSummary {
    pub total: usize,
    pub resized: usize,
    pub failed: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl ResizeSummary {
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// Image files directly inside `dir` with a recognised extension (any case), sorted.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>, MediaError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| RECOGNIZED_EXTENSIONS.contains(&e.as_str()));
        if recognized {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Transcode every over-budget image in `dir` in place, keeping its filename.
///
/// Per-file failures are reported through `on_event` and counted; they never
/// abort the run. Only an unreadable directory is an error.
pub fn resize_directory<F>(
    dir: &Path,
    budget: &TranscodeBudget,
    dry_run: bool,
    mut on_event: F,
) -> Result<ResizeSummary, MediaError>
where
    F: FnMut(ResizeEvent),
{
    let images = find_images(dir)?;
    on_event(ResizeEvent::Scanned {
        total: images.len(),
    });

    let mut summary = ResizeSummary {
        total: images.len(),
        ..Default::default()
    };

    for path in images {
        let size = match fs::metadata(&path) {
            Ok(m) => m.len(),
            Err(e) => {
                summary.failed += 1;
                on_event(ResizeEvent::Failed {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        summary.bytes_before += size;

        if !budget.is_over(size) {
            summary.bytes_after += size;
            on_event(ResizeEvent::WithinBudget { path, size });
            continue;
        }

        if dry_run {
            summary.bytes_after += size;
            on_event(ResizeEvent::WouldResize { path, size });
            continue;
        }

        match resize_file(&path, budget) {
            Ok(Some((after, quality))) => {
                summary.resized += 1;
                summary.bytes_after += after;
                on_event(ResizeEvent::Resized {
                    path,
                    before: size,
                    after,
                    quality,
                });
            }
            Ok(None) => {
                summary.bytes_after += size;
                on_event(ResizeEvent::Unchanged { path, size });
            }
            Err(e) => {
                log::warn!("Failed to resize {}: {e}", path.display());
                summary.failed += 1;
                summary.bytes_after += size;
                on_event(ResizeEvent::Failed {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

/// Transcode one file in place. Returns the new size and quality, or `None`
/// if the transcode was not smaller than the original.
pub fn resize_file(path: &Path, budget: &TranscodeBudget) -> Result<Option<(u64, u8)>, MediaError> {
    let raw = fs::read(path)?;
    let out = transcode(&raw, budget)?;
    if out.bytes.len() >= raw.len() {
        return Ok(None);
    }
    atomic_write(path, &out.bytes)?;
    Ok(Some((out.bytes.len() as u64, out.quality)))
}

#[cfg(test)]
#[path = "tests/resize_tests.rs"]
mod tests;
