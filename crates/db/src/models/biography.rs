//! Biography singleton model.

use serde::{Deserialize, Serialize};
use showreel_core::types::Timestamp;
use sqlx::FromRow;

/// The single row of the `biography` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Biography {
    pub name: String,
    pub headline: Option<String>,
    pub bio: String,
    pub profile_image_url: Option<String>,
    pub locations: Vec<String>,
    pub courses: Vec<String>,
    pub clients: Vec<String>,
    pub member_of: Vec<String>,
    pub skills: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full replacement of the biography. Arrays overwrite the stored arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBiography {
    pub name: String,
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: String,
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default)]
    pub member_of: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}
