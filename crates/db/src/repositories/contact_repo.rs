//! Repositories for `contact_settings` and `contact_submissions`.

use showreel_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use showreel_core::status::{SUBMISSION_FAILED, SUBMISSION_SENT};
use showreel_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{
    ContactSettings, ContactSubmission, CreateContactSubmission, UpsertContactSettings,
};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

const SETTINGS_COLUMNS: &str = "email, phone, location, availability, social_links, \
                                auto_reply_enabled, created_at, updated_at";

/// Reads and replaces the singleton contact settings.
pub struct ContactSettingsRepo;

impl ContactSettingsRepo {
    /// The settings, or `None` before they were first saved.
    pub async fn get(pool: &PgPool) -> Result<Option<ContactSettings>, sqlx::Error> {
        let query = format!("SELECT {SETTINGS_COLUMNS} FROM contact_settings WHERE id = 1");
        sqlx::query_as::<_, ContactSettings>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Create or fully replace the settings.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertContactSettings,
    ) -> Result<ContactSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_settings
                (id, email, phone, location, availability, social_links, auto_reply_enabled)
             VALUES (1, $1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                location = EXCLUDED.location,
                availability = EXCLUDED.availability,
                social_links = EXCLUDED.social_links,
                auto_reply_enabled = EXCLUDED.auto_reply_enabled
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, ContactSettings>(&query)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.location)
            .bind(&input.availability)
            .bind(&input.social_links)
            .bind(input.auto_reply_enabled)
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

const SUBMISSION_COLUMNS: &str = "id, name, email, subject, message, ip_address, status, \
                                  error_message, created_at, updated_at";

/// Append-only log of contact-form messages and their delivery outcome.
pub struct ContactSubmissionRepo;

impl ContactSubmissionRepo {
    /// Record a submission as `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactSubmission,
    ) -> Result<ContactSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_submissions (name, email, subject, message, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SUBMISSION_COLUMNS}"
        );
        sqlx::query_as::<_, ContactSubmission>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Mark a submission as delivered.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE contact_submissions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(SUBMISSION_SENT)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a submission as undeliverable.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contact_submissions SET status = $2, error_message = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(SUBMISSION_FAILED)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Newest submissions first.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ContactSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM contact_submissions
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ContactSubmission>(&query)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }
}
