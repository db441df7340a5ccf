//! Admin endpoints for `/api/admin/projects`.
//!
//! Creation and video attachment accept `multipart/form-data`; creation
//! also accepts a plain JSON body. Files are read chunk by chunk and
//! rejected as soon as they pass the size limit for their kind.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use showreel_core::error::CoreError;
use showreel_core::media::{self, MediaKind, UploadError};
use showreel_core::ordering::OrderUpdate;
use showreel_core::types::DbId;
use showreel_db::models::project::Project;
use showreel_db::models::video_upload::VideoUpload;
use showreel_db::repositories::{ProjectRepo, VideoUploadRepo};

use crate::engine::portfolio::{self, MediaUpload, ProjectFiles, ProjectInput, ProjectUpdate};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest request body accepted on upload routes: one video, one
/// thumbnail and room for the text fields.
pub const MAX_UPLOAD_BODY_BYTES: usize =
    (media::MAX_VIDEO_BYTES + media::MAX_IMAGE_BYTES) as usize + 1024 * 1024;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One entry of a reorder batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: DbId,
    pub display_order: i64,
    pub version: Option<i32>,
}

/// Body of `POST /api/admin/projects/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub updates: Vec<ReorderItem>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/projects -- every project, drafts included.
pub async fn list_all(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/admin/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/admin/projects
///
/// JSON creates a draft. Multipart may carry a `video` file, an optional
/// `thumbnail` image, and the metadata either as a `data` JSON field or as
/// individual text fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    request: Request,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (input, files) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let form = read_project_form(multipart).await?;
        let files = match (form.video, form.thumbnail) {
            (Some(video), thumbnail) => Some(ProjectFiles { video, thumbnail }),
            (None, Some(_)) => {
                return Err(AppError::BadRequest(
                    "thumbnail: a thumbnail can only be uploaded together with a video".into(),
                ))
            }
            (None, None) => None,
        };
        (form.input, files)
    } else {
        let Json(input) = Json::<ProjectInput>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        (input, None)
    };

    let project = portfolio::create_project(&state, input, files, admin.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PATCH /api/admin/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectUpdate>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = portfolio::update_project(&state, id, input).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/admin/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    portfolio::delete_project(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/projects/reorder
pub async fn reorder(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<ReorderResult>>> {
    let updates: Vec<OrderUpdate> = input
        .updates
        .into_iter()
        .map(|item| OrderUpdate {
            id: item.id,
            display_order: item.display_order,
            expected_version: item.version,
        })
        .collect();

    let updated = portfolio::reorder_projects(&state, &updates).await?;
    Ok(Json(DataResponse {
        data: ReorderResult { updated },
    }))
}

/// POST /api/admin/projects/{id}/video
pub async fn attach_video(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Project>>> {
    let form = read_project_form(multipart).await?;
    let video = form
        .video
        .ok_or_else(|| AppError::BadRequest("video: a video file is required".into()))?;

    let files = ProjectFiles {
        video,
        thumbnail: form.thumbnail,
    };
    let project = portfolio::attach_video(&state, id, files, admin.user_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/admin/projects/{id}/uploads -- newest first.
pub async fn list_uploads(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VideoUpload>>>> {
    find_project(&state, id).await?;
    let uploads = VideoUploadRepo::list_for_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: uploads }))
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Everything a project form can carry.
#[derive(Debug, Default)]
struct ProjectForm {
    input: ProjectInput,
    video: Option<MediaUpload>,
    thumbnail: Option<MediaUpload>,
}

async fn read_project_form(mut multipart: Multipart) -> AppResult<ProjectForm> {
    let mut form = ProjectForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => form.video = Some(read_file(field, MediaKind::Video).await?),
            "thumbnail" => form.thumbnail = Some(read_file(field, MediaKind::Image).await?),
            "data" => {
                let raw = field.text().await.map_err(multipart_error)?;
                form.input = serde_json::from_str(&raw)
                    .map_err(|e| AppError::BadRequest(format!("data: invalid JSON: {e}")))?;
            }
            _ => {
                let value = field.text().await.map_err(multipart_error)?;
                apply_text_field(&mut form.input, &name, value)?;
            }
        }
    }

    Ok(form)
}

/// Set one metadata field sent as plain multipart text.
fn apply_text_field(input: &mut ProjectInput, name: &str, value: String) -> AppResult<()> {
    match name {
        "title" => input.title = value,
        "description" => input.description = Some(value),
        "category" => input.category = Some(value),
        "client" => input.client = Some(value),
        "agency" => input.agency = Some(value),
        "role" => input.role = Some(value),
        "duration" => input.duration = Some(value),
        "tags" => input.tags = parse_tags(&value)?,
        "year" => {
            let trimmed = value.trim();
            input.year = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.parse().map_err(|_| {
                    AppError::Core(CoreError::Validation("year: must be a number".into()))
                })?)
            };
        }
        "featured" => {
            input.featured = matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on")
        }
        other => tracing::debug!(field = other, "Ignoring unknown form field"),
    }
    Ok(())
}

/// Tags arrive either as a JSON array or comma-separated.
fn parse_tags(raw: &str) -> AppResult<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| AppError::BadRequest(format!("tags: invalid JSON array: {e}")));
    }
    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}

/// Buffer a file field, failing once it exceeds the limit for `kind`.
async fn read_file(mut field: Field<'_>, kind: MediaKind) -> AppResult<MediaUpload> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| kind.as_str().to_string());
    let mime_type = media::effective_mime(field.content_type(), &file_name);
    let limit = kind.max_bytes();

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        let size = (data.len() + chunk.len()) as u64;
        if size > limit {
            return Err(UploadError::TooLarge {
                kind: kind.as_str(),
                size,
                limit,
            }
            .into());
        }
        data.extend_from_slice(&chunk);
    }

    Ok(MediaUpload {
        file_name,
        mime_type,
        data,
    })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Upload(UploadError::TooLarge {
            kind: "request",
            size: MAX_UPLOAD_BODY_BYTES as u64 + 1,
            limit: MAX_UPLOAD_BODY_BYTES as u64,
        });
    }
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            })
        })
}
