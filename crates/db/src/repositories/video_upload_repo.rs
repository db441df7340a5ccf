//! Repository for the `video_uploads` table.

use showreel_core::status::{UPLOAD_COMPLETED, UPLOAD_FAILED};
use showreel_core::types::DbId;
use sqlx::PgPool;

use crate::models::video_upload::{CreateVideoUpload, VideoUpload};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, original_file_name, file_name, file_size, mime_type, \
                       upload_status, thumbnail_file_name, uploaded_by, description, \
                       error_message, created_at, updated_at";

/// Provides CRUD operations for video upload records.
pub struct VideoUploadRepo;

impl VideoUploadRepo {
    /// Record the start of an upload in the `uploading` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVideoUpload,
    ) -> Result<VideoUpload, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_uploads
                (project_id, original_file_name, file_size, mime_type, uploaded_by, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoUpload>(&query)
            .bind(input.project_id)
            .bind(&input.original_file_name)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(input.uploaded_by)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Mark an upload completed with the remote ids it produced.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        file_name: &str,
        thumbnail_file_name: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video_uploads SET upload_status = $2, file_name = $3, thumbnail_file_name = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(UPLOAD_COMPLETED)
        .bind(file_name)
        .bind(thumbnail_file_name)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an upload failed with a human-readable reason.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video_uploads SET upload_status = $2, error_message = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(UPLOAD_FAILED)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Upload history for a project, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<VideoUpload>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_uploads WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, VideoUpload>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find an upload record by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VideoUpload>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_uploads WHERE id = $1");
        sqlx::query_as::<_, VideoUpload>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
