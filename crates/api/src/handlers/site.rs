//! Biography and contact settings singletons.

use axum::extract::State;
use axum::Json;
use showreel_core::cache::{CacheKey, Mutation};
use showreel_core::contact::validate_email;
use showreel_core::error::CoreError;
use showreel_db::models::biography::{Biography, UpsertBiography};
use showreel_db::models::contact::{ContactSettings, UpsertContactSettings};
use showreel_db::repositories::{BiographyRepo, ContactSettingsRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Both singletons live in row `id = 1`.
const SINGLETON_ID: i64 = 1;

/// GET /api/biography
pub async fn get_biography(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let data = state
        .cache
        .get_or_load(CacheKey::Biography, || async {
            match BiographyRepo::get(&state.pool).await {
                Ok(Some(bio)) => Ok(bio),
                Ok(None) => Err(AppError::Core(CoreError::NotFound {
                    entity: "Biography",
                    id: SINGLETON_ID,
                })),
                Err(e) => Err(AppError::from(e)),
            }
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/admin/biography
///
/// Replaces the whole biography, including every list.
pub async fn upsert_biography(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut input): Json<UpsertBiography>,
) -> AppResult<Json<DataResponse<Biography>>> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(CoreError::Validation("name: must not be empty".into()).into());
    }
    for list in [
        &mut input.locations,
        &mut input.courses,
        &mut input.clients,
        &mut input.member_of,
        &mut input.skills,
    ] {
        tidy_list(list);
    }

    let bio = BiographyRepo::upsert(&state.pool, &input).await?;
    tracing::info!("Biography updated");
    state.cache.invalidate(&Mutation::BiographyChanged).await;
    Ok(Json(DataResponse { data: bio }))
}

/// GET /api/contact-settings
pub async fn get_contact_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let data = state
        .cache
        .get_or_load(CacheKey::ContactSettings, || async {
            match ContactSettingsRepo::get(&state.pool).await {
                Ok(Some(settings)) => Ok(settings),
                Ok(None) => Err(AppError::Core(CoreError::NotFound {
                    entity: "ContactSettings",
                    id: SINGLETON_ID,
                })),
                Err(e) => Err(AppError::from(e)),
            }
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/admin/contact-settings
pub async fn upsert_contact_settings(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut input): Json<UpsertContactSettings>,
) -> AppResult<Json<DataResponse<ContactSettings>>> {
    input.email = input.email.trim().to_string();
    validate_email("email", &input.email)?;
    if !input.social_links.is_object() {
        return Err(CoreError::Validation(
            "socialLinks: must be an object of platform to URL".into(),
        )
        .into());
    }

    let settings = ContactSettingsRepo::upsert(&state.pool, &input).await?;
    tracing::info!("Contact settings updated");
    state.cache.invalidate(&Mutation::ContactSettingsChanged).await;
    Ok(Json(DataResponse { data: settings }))
}

/// Trim entries and drop blanks, keeping order.
fn tidy_list(list: &mut Vec<String>) {
    *list = list
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
}
