//! Shared types and pure helpers for artwork image resolution.
//!
//! Nothing in this crate touches the network or the filesystem: it derives
//! cache keys from artwork identities and classifies/rewrites image URLs
//! following the encyclopedia's media hosting conventions.

pub mod identity;
pub mod image_url;

pub use identity::{ArtworkIdentity, CacheKey, MAX_KEY_LEN, UNKNOWN_LABEL, sanitize_component};
pub use image_url::{
    SHARED_NAMESPACE, absolutize, hosting_namespace, is_hosted_image, is_thumbnail_rendition,
    is_vector_image, normalize_url, to_original,
};
