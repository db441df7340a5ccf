//! Public, cached read endpoints for projects and portfolio statistics.
//!
//! Only published projects are ever returned here.

use axum::extract::{Path, Query, State};
use axum::Json;
use showreel_core::cache::CacheKey;
use showreel_core::error::CoreError;
use showreel_core::types::DbId;
use showreel_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::query::CategoryFilter;
use crate::response::DataResponse;
use crate::state::AppState;

type JsonData = Json<DataResponse<serde_json::Value>>;

/// GET /api/projects
///
/// Published projects in display order. The unfiltered list is cached;
/// `?category=` queries always hit the database.
pub async fn list_published(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<JsonData> {
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let data = match category {
        Some(category) => {
            let projects = ProjectRepo::list_published(&state.pool, Some(category)).await?;
            serde_json::to_value(projects)
                .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?
        }
        None => {
            state
                .cache
                .get_or_load(CacheKey::PublishedProjects, || async {
                    Ok::<_, AppError>(ProjectRepo::list_published(&state.pool, None).await?)
                })
                .await?
        }
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/projects/featured
pub async fn list_featured(State(state): State<AppState>) -> AppResult<JsonData> {
    let data = state
        .cache
        .get_or_load(CacheKey::FeaturedProjects, || async {
            Ok::<_, AppError>(ProjectRepo::list_featured(&state.pool).await?)
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/projects/{id}
///
/// Drafts and processing projects are reported as missing.
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<JsonData> {
    let data = state
        .cache
        .get_or_load(CacheKey::Project(id), || async {
            match ProjectRepo::find_published(&state.pool, id).await {
                Ok(Some(project)) => Ok(project),
                Ok(None) => Err(AppError::Core(CoreError::NotFound {
                    entity: "Project",
                    id,
                })),
                Err(e) => Err(AppError::from(e)),
            }
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<JsonData> {
    let data = state
        .cache
        .get_or_load(CacheKey::PortfolioStats, || async {
            Ok::<_, AppError>(ProjectRepo::stats(&state.pool).await?)
        })
        .await?;
    Ok(Json(DataResponse { data }))
}
