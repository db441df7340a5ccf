//! Repository for the singleton `biography` row.

use sqlx::PgPool;

use crate::models::biography::{Biography, UpsertBiography};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "name, headline, bio, profile_image_url, locations, courses, clients, \
                       member_of, skills, created_at, updated_at";

/// Reads and replaces the site biography.
pub struct BiographyRepo;

impl BiographyRepo {
    /// The biography, or `None` before it was first saved.
    pub async fn get(pool: &PgPool) -> Result<Option<Biography>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM biography WHERE id = 1");
        sqlx::query_as::<_, Biography>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Create or fully replace the biography.
    pub async fn upsert(pool: &PgPool, input: &UpsertBiography) -> Result<Biography, sqlx::Error> {
        let query = format!(
            "INSERT INTO biography
                (id, name, headline, bio, profile_image_url, locations, courses, clients,
                 member_of, skills)
             VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                profile_image_url = EXCLUDED.profile_image_url,
                locations = EXCLUDED.locations,
                courses = EXCLUDED.courses,
                clients = EXCLUDED.clients,
                member_of = EXCLUDED.member_of,
                skills = EXCLUDED.skills
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Biography>(&query)
            .bind(&input.name)
            .bind(&input.headline)
            .bind(&input.bio)
            .bind(&input.profile_image_url)
            .bind(&input.locations)
            .bind(&input.courses)
            .bind(&input.clients)
            .bind(&input.member_of)
            .bind(&input.skills)
            .fetch_one(pool)
            .await
    }
}
