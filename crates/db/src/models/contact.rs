//! Contact settings singleton and contact submission models.

use serde::{Deserialize, Serialize};
use showreel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// The single row of the `contact_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettings {
    /// Recipient of contact-form notifications.
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    /// Platform name to profile URL.
    pub social_links: serde_json::Value,
    pub auto_reply_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full replacement of the contact settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContactSettings {
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    #[serde(default = "empty_object")]
    pub social_links: serde_json::Value,
    #[serde(default)]
    pub auto_reply_enabled: bool,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A row from the append-only `contact_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub ip_address: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a submission before delivery is attempted.
#[derive(Debug, Clone)]
pub struct CreateContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub ip_address: Option<String>,
}
