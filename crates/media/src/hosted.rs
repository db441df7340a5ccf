//! HTTP client for a Cloudinary-compatible media API.
//!
//! Uploads and deletions are signed with SHA-256 over the sorted request
//! parameters followed by the API secret. Delivery URLs are built locally;
//! deriving a thumbnail or an optimised rendition never hits the network.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use showreel_core::media::{check_size, MediaKind, UploadError};

use crate::{MediaConfig, MediaStore, StoredMedia, UploadMetadata};

/// Transformation applied to derived video thumbnails.
const THUMBNAIL_TRANSFORMATION: &str = "w_1280,h_720,c_fill,q_auto";

/// Transformation applied to optimised video renditions.
const OPTIMIZED_VIDEO_TRANSFORMATION: &str = "q_auto,f_auto";

/// Successful upload response (only the fields we use).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

/// Response of the `destroy` endpoint.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// [`MediaStore`] backed by the hosted media API.
pub struct HostedMediaStore {
    client: reqwest::Client,
    config: MediaConfig,
}

impl HostedMediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: MediaConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            kind.as_str(),
            action
        )
    }

    fn delivery_url(&self, transformation: &str, content_id: &str, extension: &str) -> String {
        format!(
            "{}/{}/video/upload/{}/{}{}",
            self.config.delivery_base.trim_end_matches('/'),
            self.config.cloud_name,
            transformation,
            content_id,
            extension
        )
    }

    /// Build a signed multipart form from the parameters to sign.
    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = sign_params(&params, &self.config.api_secret);
        params.into_iter().fold(
            Form::new()
                .text("api_key", self.config.api_key.clone())
                .text("signature", signature)
                .text("signature_algorithm", "sha256"),
            |form, (name, value)| form.text(name, value),
        )
    }
}

#[async_trait]
impl MediaStore for HostedMediaStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        metadata: &UploadMetadata,
    ) -> Result<StoredMedia, UploadError> {
        let size = data.len() as u64;
        check_size(metadata.kind, size)?;

        let part = Part::bytes(data)
            .file_name(metadata.file_name.clone())
            .mime_str(&metadata.mime_type)
            .map_err(|e| UploadError::Unknown(e.to_string()))?;

        let form = self
            .signed_form(vec![
                ("folder", self.config.folder.clone()),
                ("timestamp", chrono::Utc::now().timestamp().to_string()),
            ])
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint(metadata.kind, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(classify_status(status.as_u16(), &body, metadata.kind, size));
        }

        let body: UploadResponse = response.json().await.map_err(transport_error)?;
        tracing::info!(
            content_id = %body.public_id,
            kind = metadata.kind.as_str(),
            size,
            "Media uploaded"
        );
        Ok(StoredMedia {
            content_id: body.public_id,
            url: body.secure_url,
        })
    }

    fn derive_thumbnail(&self, content_id: &str, at_offset_secs: f64) -> String {
        let offset = at_offset_secs.max(0.0);
        self.delivery_url(
            &format!("so_{offset},{THUMBNAIL_TRANSFORMATION}"),
            content_id,
            ".jpg",
        )
    }

    fn optimized_video_url(&self, content_id: &str) -> String {
        self.delivery_url(OPTIMIZED_VIDEO_TRANSFORMATION, content_id, "")
    }

    async fn delete_media(&self, content_id: &str, kind: MediaKind) -> Result<(), UploadError> {
        let form = self.signed_form(vec![
            ("public_id", content_id.to_string()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ]);

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(classify_status(status.as_u16(), &body, kind, 0));
        }

        let body: DestroyResponse = response.json().await.map_err(transport_error)?;
        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                tracing::debug!(content_id, "Media already absent from store");
                Ok(())
            }
            other => Err(UploadError::Unknown(format!(
                "unexpected destroy result '{other}' for {content_id}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `sha256("k1=v1&k2=v2..." + secret)` with keys sorted, hex-encoded.
pub fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    let joined = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{joined}{secret}")))
}

/// Map a non-2xx response onto the upload failure taxonomy.
pub fn classify_status(status: u16, body: &str, kind: MediaKind, size: u64) -> UploadError {
    match status {
        413 => UploadError::TooLarge {
            kind: kind.as_str(),
            size,
            limit: kind.max_bytes(),
        },
        400 if body.contains("File size too large") => UploadError::TooLarge {
            kind: kind.as_str(),
            size,
            limit: kind.max_bytes(),
        },
        420 | 429 => UploadError::RemoteQuotaExceeded,
        408 | 504 => UploadError::RemoteTimeout,
        _ => UploadError::Unknown(format!("media store returned {status}: {body}")),
    }
}

fn transport_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        UploadError::RemoteTimeout
    } else {
        UploadError::Unknown(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
