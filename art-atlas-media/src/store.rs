//! Flat-directory image cache keyed by [`CacheKey`].
//!
//! Existence on disk is the only record of an artwork having been resolved;
//! there is no manifest. Writes go through a temporary file in the same
//! directory and a rename, so readers never see a partially written image.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use art_atlas_core::CacheKey;

use crate::MediaError;
use crate::transcode::CANONICAL_EXTENSION;

/// Extensions probed by [`ImageStore::exists`], in preference order: the
/// canonical output extension first, then formats left behind by earlier runs.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[CANONICAL_EXTENSION, "jpeg", "png", "webp", "gif"];

/// Upper-case spellings of [`RECOGNIZED_EXTENSIONS`], index for index.
const UPPERCASE_EXTENSIONS: &[&str] = &["JPG", "JPEG", "PNG", "WEBP", "GIF"];

/// Extensions to probe for a key: each recognised extension in lower case,
/// then in upper case, in preference order.
pub(crate) fn probe_extensions() -> impl Iterator<Item = &'static str> {
    RECOGNIZED_EXTENSIONS
        .iter()
        .zip(UPPERCASE_EXTENSIONS)
        .flat_map(|(lower, upper)| [*lower, *upper])
}

/// An image held in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: CacheKey,
    pub extension: String,
    pub byte_size: u64,
}

impl StoredImage {
    pub fn file_name(&self) -> String {
        self.key.file_name(&self.extension)
    }
}

/// Storage backend for transcoded images.
pub trait ImageStore {
    /// First recognised extension under which `key` is stored, if any. The
    /// extension is returned as spelled on disk (`jpg` or `JPG`).
    fn exists(&self, key: &CacheKey) -> Option<&'static str>;

    /// Store `bytes` as `<key>.<extension>`, all-or-nothing.
    ///
    /// Does not check for an existing image first; callers that want
    /// idempotence call [`exists`](Self::exists) themselves.
    fn write_atomically(
        &self,
        key: &CacheKey,
        extension: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, MediaError>;

    fn read(&self, key: &CacheKey, extension: &str) -> Result<Vec<u8>, MediaError>;
}

/// [`ImageStore`] backed by one directory on disk.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey, extension: &str) -> PathBuf {
        self.root.join(key.file_name(extension))
    }
}

impl ImageStore for FsImageStore {
    fn exists(&self, key: &CacheKey) -> Option<&'static str> {
        probe_extensions().find(|ext| self.path_for(key, ext).is_file())
    }

    fn write_atomically(
        &self,
        key: &CacheKey,
        extension: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, MediaError> {
        if key.is_empty() {
            return Err(MediaError::store("refusing to store an image under an empty key"));
        }
        let dest = self.path_for(key, extension);
        if dest.exists() {
            log::warn!("Replacing existing image {}", dest.display());
        }
        atomic_write(&dest, bytes)?;
        log::debug!("Stored {} ({} bytes)", dest.display(), bytes.len());
        Ok(StoredImage {
            key: key.clone(),
            extension: extension.trim_start_matches('.').to_string(),
            byte_size: bytes.len() as u64,
        })
    }

    fn read(&self, key: &CacheKey, extension: &str) -> Result<Vec<u8>, MediaError> {
        Ok(fs::read(self.path_for(key, extension))?)
    }
}

/// In-memory [`ImageStore`], for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ImageStore for MemoryImageStore {
    fn exists(&self, key: &CacheKey) -> Option<&'static str> {
        let files = self.lock();
        probe_extensions().find(|ext| files.contains_key(&key.file_name(ext)))
    }

    fn write_atomically(
        &self,
        key: &CacheKey,
        extension: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, MediaError> {
        if key.is_empty() {
            return Err(MediaError::store("refusing to store an image under an empty key"));
        }
        self.lock().insert(key.file_name(extension), bytes.to_vec());
        Ok(StoredImage {
            key: key.clone(),
            extension: extension.trim_start_matches('.').to_string(),
            byte_size: bytes.len() as u64,
        })
    }

    fn read(&self, key: &CacheKey, extension: &str) -> Result<Vec<u8>, MediaError> {
        self.lock()
            .get(&key.file_name(extension))
            .cloned()
            .ok_or_else(|| MediaError::store(format!("no image stored as {}", key.file_name(extension))))
    }
}

/// Write `bytes` to `dest` via a temporary sibling file and a rename.
///
/// On any failure the temporary file is removed and `dest` is left untouched.
pub fn atomic_write(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("{} has no file name", dest.display())))?;
    let tmp = dest.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = write_and_sync(&tmp, bytes).and_then(|()| fs::rename(&tmp, dest));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
