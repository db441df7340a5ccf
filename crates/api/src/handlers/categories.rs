//! Category listing (public) and CRUD (admin).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use showreel_core::cache::{CacheKey, Mutation};
use showreel_core::error::CoreError;
use showreel_core::slug::{slugify, validate_slug};
use showreel_core::types::DbId;
use showreel_db::models::category::{Category, CreateCategory, UpdateCategory};
use showreel_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let data = state
        .cache
        .get_or_load(CacheKey::Categories, || async {
            Ok::<_, AppError>(CategoryRepo::list(&state.pool).await?)
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/categories
///
/// The slug defaults to [`slugify`] of the name.
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = validate_name(&input.name)?;
    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(&name),
    };
    validate_slug(&slug)?;
    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let category =
        CategoryRepo::create(&state.pool, &name, &slug, description, input.display_order).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    state.cache.invalidate(&Mutation::CategoryChanged).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PATCH /api/admin/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let name = input.name.as_deref().map(validate_name).transpose()?;
    let slug = input.slug.as_deref().map(str::trim);
    if let Some(slug) = slug {
        validate_slug(slug)?;
    }
    let description = input.description.as_deref().map(str::trim);

    let category = CategoryRepo::update(
        &state.pool,
        id,
        name.as_deref(),
        slug,
        description,
        input.display_order,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Category",
        id,
    })?;

    state.cache.invalidate(&Mutation::CategoryChanged).await;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/admin/categories/{id}
///
/// Projects that reference the slug keep it.
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Category",
            id,
        }
        .into());
    }
    tracing::info!(category_id = id, "Category deleted");
    state.cache.invalidate(&Mutation::CategoryChanged).await;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name: must not be empty".into()));
    }
    Ok(trimmed.to_string())
}
