//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use showreel_core::status::ProjectStatus;
use showreel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A project row from the `projects` table, with its rank in the total order.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub agency: Option<String>,
    pub role: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i32>,
    pub duration: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_public_id: Option<String>,
    pub thumbnail_public_id: Option<String>,
    #[serde(skip)]
    pub sort_key: i64,
    /// Dense 0-based position in `(sort_key, id)` order.
    pub display_order: i64,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub featured: bool,
    pub version: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated values for a new project row.
///
/// The ordering key is chosen by the repository so callers cannot place a
/// project anywhere but the front of the listing.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub agency: Option<String>,
    pub role: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i32>,
    pub duration: Option<String>,
    pub featured: bool,
    pub created_by: Option<DbId>,
}

/// Partial update of a project's descriptive fields and flags.
///
/// `None` leaves a column untouched. For the optional text columns an empty
/// string clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub agency: Option<String>,
    pub role: Option<String>,
    pub tags: Option<Vec<String>>,
    pub year: Option<i32>,
    pub duration: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
}

/// Media columns written together with the status they allow.
#[derive(Debug, Clone)]
pub struct ProjectMedia {
    pub video_url: String,
    pub video_public_id: String,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub status: ProjectStatus,
}

/// Count of published projects per category slug.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Aggregate figures for the public site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub published_projects: i64,
    pub featured_projects: i64,
    pub clients: i64,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    pub by_category: Vec<CategoryCount>,
}
