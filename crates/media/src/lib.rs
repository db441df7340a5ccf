//! Media store adapter.
//!
//! [`MediaStore`] is the seam between the upload pipeline and whatever
//! hosts the binaries. [`hosted::HostedMediaStore`] talks to a
//! Cloudinary-compatible HTTP API; tests substitute an in-memory fake.

pub mod config;
pub mod hosted;

use async_trait::async_trait;
use showreel_core::media::{MediaKind, UploadError};

pub use config::MediaConfig;
pub use hosted::HostedMediaStore;

/// Describes a binary handed to [`MediaStore::upload`].
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub kind: MediaKind,
    /// Client-supplied file name, used for the remote display name.
    pub file_name: String,
    pub mime_type: String,
}

/// Where an uploaded binary ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Remote identifier used for later derivation and deletion.
    pub content_id: String,
    /// Public delivery URL.
    pub url: String,
}

/// Remote storage for project videos and thumbnails.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` and return its id and public URL.
    async fn upload(
        &self,
        data: Vec<u8>,
        metadata: &UploadMetadata,
    ) -> Result<StoredMedia, UploadError>;

    /// URL of a still frame taken `at_offset_secs` into a stored video.
    fn derive_thumbnail(&self, content_id: &str, at_offset_secs: f64) -> String;

    /// URL of a delivery-optimised rendition of a stored video.
    fn optimized_video_url(&self, content_id: &str) -> String;

    /// Remove stored content. Callers treat failures as non-fatal.
    async fn delete_media(&self, content_id: &str, kind: MediaKind) -> Result<(), UploadError>;
}
