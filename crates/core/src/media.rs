//! Upload constraints and the upload failure taxonomy.
//!
//! Size and type checks run before any bytes leave the server, so a file the
//! media store would reject never costs a network round trip.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted video upload (100 MiB).
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// Largest accepted thumbnail upload (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted video MIME types.
pub const VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/quicktime",
    "video/mov",
    "video/avi",
    "video/x-msvideo",
];

/// Accepted thumbnail MIME types.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Default offset (seconds into the video) for derived thumbnails.
pub const DEFAULT_THUMBNAIL_OFFSET_SECS: f64 = 1.0;

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Kind of binary content held by the media store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }

    /// Upper size bound for this kind.
    pub fn max_bytes(self) -> u64 {
        match self {
            Self::Video => MAX_VIDEO_BYTES,
            Self::Image => MAX_IMAGE_BYTES,
        }
    }

    fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            Self::Video => VIDEO_MIME_TYPES,
            Self::Image => IMAGE_MIME_TYPES,
        }
    }
}

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

/// Why an upload did not produce stored media.
///
/// The variant is surfaced to the admin client so it can suggest the right
/// fix (compress, retry, upgrade the hosting plan).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{kind} is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        kind: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("media store did not respond in time")]
    RemoteTimeout,

    #[error("media store quota exceeded")]
    RemoteQuotaExceeded,

    #[error("upload failed: {0}")]
    Unknown(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject content larger than the limit for its kind.
pub fn check_size(kind: MediaKind, size: u64) -> Result<(), UploadError> {
    let limit = kind.max_bytes();
    if size > limit {
        return Err(UploadError::TooLarge {
            kind: kind.as_str(),
            size,
            limit,
        });
    }
    Ok(())
}

/// Reject content whose MIME type is not accepted for its kind.
///
/// Parameters such as `; codecs=...` are ignored and matching is
/// case-insensitive.
pub fn check_mime(kind: MediaKind, mime: &str) -> Result<(), CoreError> {
    let normalized = normalize_mime(mime);
    if kind.allowed_mime_types().contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{}: unsupported file type '{normalized}'. Accepted: {}",
            kind.as_str(),
            kind.allowed_mime_types().join(", ")
        )))
    }
}

/// Lowercase a MIME type and strip its parameters.
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Best-effort MIME type for a file name, used when the client sends
/// `application/octet-stream` or no content type at all.
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" | "qt" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Resolve the effective MIME type of an uploaded part.
pub fn effective_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(normalize_mime) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime,
        _ => mime_from_file_name(file_name)
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}
