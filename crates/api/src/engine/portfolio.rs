//! Ordering & status engine for portfolio projects.
//!
//! Each public function is one admin operation. Ordering changes run inside
//! a single transaction under the collection lock; status changes are
//! checked against [`showreel_core::status`] before anything is written.
//! Uploads to the media store share one deadline per call and run on a
//! spawned task, and a failed upload during creation removes the
//! half-created project again.

use std::time::Duration;

use chrono::Datelike;
use serde::Deserialize;
use showreel_core::cache::Mutation;
use showreel_core::error::CoreError;
use showreel_core::media::{self, MediaKind, UploadError, DEFAULT_THUMBNAIL_OFFSET_SECS};
use showreel_core::ordering::{self, OrderUpdate};
use showreel_core::project::{
    normalize_optional, normalize_tags, validate_duration, validate_title, validate_year,
};
use showreel_core::status::{self, ProjectStatus};
use showreel_core::types::DbId;
use showreel_db::models::project::{NewProject, Project, ProjectMedia, ProjectPatch};
use showreel_db::models::video_upload::CreateVideoUpload;
use showreel_db::repositories::{ProjectRepo, VideoUploadRepo};
use showreel_media::{MediaStore, StoredMedia, UploadMetadata};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Descriptive fields of a new project, as sent by the admin client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub agency: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub year: Option<i32>,
    pub duration: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl ProjectInput {
    /// Trim and validate every field into an insertable row.
    pub fn into_new_project(self, created_by: DbId) -> Result<NewProject, CoreError> {
        let title = validate_title(&self.title)?;
        if let Some(year) = self.year {
            validate_year(year, current_year())?;
        }
        let duration = normalize_optional(self.duration);
        if let Some(duration) = &duration {
            validate_duration(duration)?;
        }

        Ok(NewProject {
            title,
            description: normalize_optional(self.description),
            category: normalize_optional(self.category),
            client: normalize_optional(self.client),
            agency: normalize_optional(self.agency),
            role: normalize_optional(self.role),
            tags: normalize_tags(&self.tags)?,
            year: self.year,
            duration,
            featured: self.featured,
            created_by: Some(created_by),
        })
    }
}

/// Partial update plus the version the client last saw.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(flatten)]
    pub patch: ProjectPatch,
    /// When present, the write only happens if the row is still at this version.
    pub version: Option<i32>,
}

/// Validate a patch. Optional text set to blank becomes `""`, which clears
/// the column.
fn normalize_patch(patch: ProjectPatch) -> Result<ProjectPatch, CoreError> {
    let title = patch.title.as_deref().map(validate_title).transpose()?;
    if let Some(year) = patch.year {
        validate_year(year, current_year())?;
    }
    let duration = patch.duration.map(|d| d.trim().to_string());
    if let Some(duration) = duration.as_deref().filter(|d| !d.is_empty()) {
        validate_duration(duration)?;
    }
    let tags = patch.tags.as_deref().map(normalize_tags).transpose()?;

    Ok(ProjectPatch {
        title,
        description: patch.description.map(|v| v.trim().to_string()),
        category: patch.category.map(|v| v.trim().to_string()),
        client: patch.client.map(|v| v.trim().to_string()),
        agency: patch.agency.map(|v| v.trim().to_string()),
        role: patch.role.map(|v| v.trim().to_string()),
        tags,
        year: patch.year,
        duration,
        featured: patch.featured,
        status: patch.status,
    })
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// A file received from the admin client, fully buffered.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaUpload {
    /// Type and size checks that run before any network call.
    pub fn validate(&self, kind: MediaKind) -> AppResult<()> {
        media::check_mime(kind, &self.mime_type)?;
        media::check_size(kind, self.data.len() as u64)?;
        Ok(())
    }

    fn size(&self) -> i64 {
        i64::try_from(self.data.len()).unwrap_or(i64::MAX)
    }
}

/// Video plus optional custom thumbnail for one upload call.
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    pub video: MediaUpload,
    pub thumbnail: Option<MediaUpload>,
}

impl ProjectFiles {
    pub fn validate(&self) -> AppResult<()> {
        self.video.validate(MediaKind::Video)?;
        if let Some(thumbnail) = &self.thumbnail {
            thumbnail.validate(MediaKind::Image)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create a project at the front of the listing.
///
/// Without files the project is a draft. With files it is published once
/// the uploads complete; if any upload fails or times out the project row
/// and its upload records are deleted, stored media is removed on a
/// best-effort basis, and the upload error is returned.
///
/// The upload runs on its own task, so a dropped request or an expired
/// route timeout never leaves a half-created project behind.
pub async fn create_project(
    state: &AppState,
    input: ProjectInput,
    files: Option<ProjectFiles>,
    user_id: DbId,
) -> AppResult<Project> {
    let new = input.into_new_project(user_id)?;

    let Some(files) = files else {
        let project = ProjectRepo::create_front(&state.pool, &new).await?;
        tracing::info!(project_id = project.id, user_id, "Draft project created");
        state.cache.invalidate(&Mutation::ProjectCreated).await;
        return Ok(project);
    };

    files.validate()?;
    state.media_store()?;

    let task_state = state.clone();
    run_detached(tokio::spawn(async move {
        create_with_upload(&task_state, new, files, user_id).await
    }))
    .await
}

async fn create_with_upload(
    state: &AppState,
    new: NewProject,
    files: ProjectFiles,
    user_id: DbId,
) -> AppResult<Project> {
    let store = state.media_store()?;
    let project = ProjectRepo::create_front(&state.pool, &new).await?;
    let mut stored = Vec::new();

    match store_and_attach(state, store, &project, files, user_id, &mut stored).await {
        Ok(project) => {
            tracing::info!(project_id = project.id, user_id, "Project created with video");
            state.cache.invalidate(&Mutation::ProjectCreated).await;
            Ok(project)
        }
        Err(err) => {
            tracing::warn!(
                project_id = project.id,
                error = %err,
                "Upload failed during creation, removing project",
            );
            if let Err(e) = ProjectRepo::delete_with_uploads(&state.pool, project.id).await {
                tracing::error!(project_id = project.id, error = %e, "Compensating delete failed");
            }
            discard_media(store, &stored).await;
            Err(err)
        }
    }
}

/// Attach or replace the video of an existing project.
///
/// A draft is shown as `processing` while the upload runs and published
/// when it completes. On failure the status reverts and the upload record
/// is marked failed. Replaced media is removed from the store afterwards.
/// Like creation, the work continues on its own task if the request goes
/// away.
pub async fn attach_video(
    state: &AppState,
    id: DbId,
    files: ProjectFiles,
    user_id: DbId,
) -> AppResult<Project> {
    files.validate()?;
    state.media_store()?;

    let task_state = state.clone();
    run_detached(tokio::spawn(async move {
        attach_with_upload(&task_state, id, files, user_id).await
    }))
    .await
}

async fn attach_with_upload(
    state: &AppState,
    id: DbId,
    files: ProjectFiles,
    user_id: DbId,
) -> AppResult<Project> {
    let store = state.media_store()?;
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;

    let before = project.status;
    let interim = status::status_while_uploading(before);
    if interim != before {
        ProjectRepo::set_status(&state.pool, id, interim).await?;
        state.cache.invalidate(&Mutation::ProjectUpdated(id)).await;
    }

    let replaces_thumbnail = files.thumbnail.is_some();
    let mut stored = Vec::new();

    match store_and_attach(state, store, &project, files, user_id, &mut stored).await {
        Ok(updated) => {
            tracing::info!(project_id = id, user_id, "Video attached");
            state.cache.invalidate(&Mutation::ProjectMediaChanged(id)).await;

            let mut replaced = Vec::new();
            if let Some(old) = project.video_public_id.filter(|old| {
                updated.video_public_id.as_deref() != Some(old.as_str())
            }) {
                replaced.push((old, MediaKind::Video));
            }
            if replaces_thumbnail {
                if let Some(old) = project.thumbnail_public_id {
                    replaced.push((old, MediaKind::Image));
                }
            }
            discard_media(store, &replaced).await;

            Ok(updated)
        }
        Err(err) => {
            let reverted = status::status_after_failed_upload(interim);
            tracing::warn!(project_id = id, error = %err, status = %reverted, "Attach failed");
            if let Err(e) = ProjectRepo::set_status(&state.pool, id, reverted).await {
                tracing::error!(project_id = id, error = %e, "Failed to revert status");
            }
            state.cache.invalidate(&Mutation::ProjectUpdated(id)).await;
            discard_media(store, &stored).await;
            Err(err)
        }
    }
}

/// Await a spawned upload task. Dropping the returned future leaves the
/// task running to completion.
async fn run_detached(handle: JoinHandle<AppResult<Project>>) -> AppResult<Project> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Upload task did not complete");
            Err(AppError::InternalError(format!("Upload task failed: {e}")))
        }
    }
}

/// Apply a partial update, honouring the optimistic `version` when given.
pub async fn update_project(
    state: &AppState,
    id: DbId,
    update: ProjectUpdate,
) -> AppResult<Project> {
    let patch = normalize_patch(update.patch)?;

    let mut tx = state.pool.begin().await?;
    let (current, video_url, version) = ProjectRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;

    if let Some(expected) = update.version {
        if expected != version {
            return Err(CoreError::Conflict(format!(
                "Project {id} was modified by another session (version {expected} != {version})"
            ))
            .into());
        }
    }
    if let Some(target) = patch.status {
        status::check_admin_transition(current, target, video_url.as_deref())?;
    }

    ProjectRepo::apply_patch(&mut tx, id, &patch).await?;
    let project = ProjectRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    tx.commit().await?;

    tracing::info!(project_id = id, version = project.version, "Project updated");
    state.cache.invalidate(&Mutation::ProjectUpdated(id)).await;
    Ok(project)
}

/// Apply a batch of `displayOrder` changes atomically.
///
/// Unknown ids and stale versions abort the whole batch. Returns the
/// number of rows whose key changed.
pub async fn reorder_projects(state: &AppState, updates: &[OrderUpdate]) -> AppResult<u64> {
    ordering::validate_updates(updates)?;

    let mut tx = state.pool.begin().await?;
    ProjectRepo::lock_ordering(&mut tx).await?;
    let rows = ProjectRepo::lock_order_rows(&mut tx).await?;
    let plan = ordering::plan_reorder(&rows, updates)?;
    let changed = ProjectRepo::set_sort_keys(&mut tx, &plan).await?;
    tx.commit().await?;

    tracing::info!(requested = updates.len(), changed, "Projects reordered");
    let touched = plan.into_iter().map(|(id, _)| id).collect();
    state
        .cache
        .invalidate(&Mutation::ProjectsReordered(touched))
        .await;
    Ok(changed)
}

/// Delete a project and its upload history, then its stored media.
pub async fn delete_project(state: &AppState, id: DbId) -> AppResult<()> {
    let project = ProjectRepo::delete_with_uploads(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    tracing::info!(project_id = id, "Project deleted");
    state.cache.invalidate(&Mutation::ProjectDeleted(id)).await;

    let orphaned: Vec<(String, MediaKind)> = project
        .video_public_id
        .map(|v| (v, MediaKind::Video))
        .into_iter()
        .chain(project.thumbnail_public_id.map(|t| (t, MediaKind::Image)))
        .collect();
    if orphaned.is_empty() {
        return Ok(());
    }
    match state.media.as_deref() {
        Some(store) => discard_media(store, &orphaned).await,
        None => tracing::warn!(project_id = id, "Media store not configured, remote media kept"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Upload pipeline
// ---------------------------------------------------------------------------

/// Upload the files, record the upload and point the project at the media.
///
/// Everything that reached the store is pushed onto `stored` so the caller
/// can clean up on failure.
async fn store_and_attach(
    state: &AppState,
    store: &dyn MediaStore,
    project: &Project,
    files: ProjectFiles,
    user_id: DbId,
    stored: &mut Vec<(String, MediaKind)>,
) -> AppResult<Project> {
    let record = VideoUploadRepo::create(
        &state.pool,
        &CreateVideoUpload {
            project_id: Some(project.id),
            original_file_name: files.video.file_name.clone(),
            file_size: files.video.size(),
            mime_type: media::normalize_mime(&files.video.mime_type),
            uploaded_by: Some(user_id),
            description: None,
        },
    )
    .await?;

    let uploaded = upload_files(state, store, files, stored).await;
    let (video, thumbnail) = match uploaded {
        Ok(result) => result,
        Err(err) => {
            if let Err(e) = VideoUploadRepo::mark_failed(&state.pool, record.id, &err.to_string()).await
            {
                tracing::error!(upload_id = record.id, error = %e, "Failed to record upload failure");
            }
            return Err(err.into());
        }
    };

    let (thumbnail_url, thumbnail_public_id) = match thumbnail {
        Some(thumb) => (Some(thumb.url), Some(thumb.content_id)),
        // Keep a custom thumbnail that was uploaded earlier.
        None if project.thumbnail_public_id.is_some() => (None, None),
        None => (
            Some(store.derive_thumbnail(&video.content_id, DEFAULT_THUMBNAIL_OFFSET_SECS)),
            None,
        ),
    };

    let media = ProjectMedia {
        video_url: store.optimized_video_url(&video.content_id),
        video_public_id: video.content_id.clone(),
        thumbnail_url,
        thumbnail_public_id,
        status: status::status_after_upload(),
    };
    if !ProjectRepo::attach_media(&state.pool, project.id, &media).await? {
        return Err(CoreError::NotFound {
            entity: "Project",
            id: project.id,
        }
        .into());
    }

    VideoUploadRepo::mark_completed(
        &state.pool,
        record.id,
        &video.content_id,
        media.thumbnail_public_id.as_deref(),
    )
    .await?;

    ProjectRepo::find_by_id(&state.pool, project.id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Project",
                id: project.id,
            }
            .into()
        })
}

async fn upload_files(
    state: &AppState,
    store: &dyn MediaStore,
    files: ProjectFiles,
    stored: &mut Vec<(String, MediaKind)>,
) -> Result<(StoredMedia, Option<StoredMedia>), UploadError> {
    // One budget for every file of the call.
    let budget = Duration::from_secs(state.config.upload_timeout_secs);
    let deadline = Instant::now() + budget;

    let video = upload_one(store, files.video, MediaKind::Video, deadline, budget).await?;
    stored.push((video.content_id.clone(), MediaKind::Video));

    let thumbnail = match files.thumbnail {
        Some(file) => {
            let thumb = upload_one(store, file, MediaKind::Image, deadline, budget).await?;
            stored.push((thumb.content_id.clone(), MediaKind::Image));
            Some(thumb)
        }
        None => None,
    };
    Ok((video, thumbnail))
}

async fn upload_one(
    store: &dyn MediaStore,
    file: MediaUpload,
    kind: MediaKind,
    deadline: Instant,
    budget: Duration,
) -> Result<StoredMedia, UploadError> {
    let metadata = UploadMetadata {
        kind,
        file_name: file.file_name,
        mime_type: media::normalize_mime(&file.mime_type),
    };
    match tokio::time::timeout_at(deadline, store.upload(file.data, &metadata)).await {
        Ok(result) => result,
        Err(_elapsed) => {
            tracing::warn!(
                kind = kind.as_str(),
                timeout_secs = budget.as_secs(),
                "Media upload timed out",
            );
            Err(UploadError::RemoteTimeout)
        }
    }
}

/// Best-effort removal of stored media; failures are only logged.
async fn discard_media(store: &dyn MediaStore, items: &[(String, MediaKind)]) {
    for (content_id, kind) in items {
        if let Err(e) = store.delete_media(content_id, *kind).await {
            tracing::warn!(
                content_id = %content_id,
                kind = kind.as_str(),
                error = %e,
                "Failed to delete stored media",
            );
        }
    }
}
