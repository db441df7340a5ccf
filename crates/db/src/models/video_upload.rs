//! Video upload record model and DTOs.

use serde::Serialize;
use showreel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `video_uploads` table: one binary upload event.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUpload {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub original_file_name: String,
    /// Remote content id, set once the media store accepted the file.
    pub file_name: Option<String>,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_status: String,
    pub thumbnail_file_name: Option<String>,
    pub uploaded_by: Option<DbId>,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording the start of an upload.
#[derive(Debug, Clone)]
pub struct CreateVideoUpload {
    pub project_id: Option<DbId>,
    pub original_file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: Option<DbId>,
    pub description: Option<String>,
}
