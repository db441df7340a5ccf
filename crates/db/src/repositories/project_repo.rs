//! Repository for the `projects` table.
//!
//! Every read goes through [`RANKED`] so rows carry their dense
//! `display_order`. Writes that change the order take the collection-wide
//! advisory lock first, which serialises front inserts and reorders.

use showreel_core::ordering::{self, FrontInsert, OrderedRow};
use showreel_core::status::ProjectStatus;
use showreel_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::project::{
    CategoryCount, NewProject, PortfolioStats, Project, ProjectMedia, ProjectPatch,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, client, agency, role, tags, year, \
                       duration, video_url, thumbnail_url, video_public_id, thumbnail_public_id, \
                       sort_key, status, featured, version, created_by, created_at, updated_at";

/// Every project with its 0-based rank in `(sort_key, id)` order.
const RANKED: &str = "SELECT p.*, ROW_NUMBER() OVER (ORDER BY p.sort_key, p.id) - 1 AS display_order \
                      FROM projects p";

/// Advisory lock key guarding the ordering of the project collection.
const ORDERING_LOCK_KEY: i64 = 0x5348_4f57_5245_454c;

/// Provides CRUD and ordering operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a project by ID, regardless of status.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, display_order FROM ({RANKED}) r WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a project by ID only if it is publicly visible.
    pub async fn find_published(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, display_order FROM ({RANKED}) r
             WHERE id = $1 AND status = 'published'"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every project in display order, for the admin panel.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS}, display_order FROM ({RANKED}) r ORDER BY display_order");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Published projects in display order, optionally narrowed to one
    /// category slug.
    pub async fn list_published(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, display_order FROM ({RANKED}) r
             WHERE status = 'published' AND ($1::TEXT IS NULL OR category = $1)
             ORDER BY display_order"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Published projects flagged as featured, in display order.
    pub async fn list_featured(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, display_order FROM ({RANKED}) r
             WHERE status = 'published' AND featured = true
             ORDER BY display_order"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Aggregate figures over published projects.
    pub async fn stats(pool: &PgPool) -> Result<PortfolioStats, sqlx::Error> {
        let totals: (i64, i64, i64, Option<i32>, Option<i32>) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE featured),
                    COUNT(DISTINCT client) FILTER (WHERE client IS NOT NULL),
                    MIN(year),
                    MAX(year)
             FROM projects WHERE status = 'published'",
        )
        .fetch_one(pool)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM projects
             WHERE status = 'published' AND category IS NOT NULL
             GROUP BY category
             ORDER BY count DESC, category ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(PortfolioStats {
            published_projects: totals.0,
            featured_projects: totals.1,
            clients: totals.2,
            earliest_year: totals.3,
            latest_year: totals.4,
            by_category,
        })
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Insert a draft project at the front of the listing.
    ///
    /// Runs in its own transaction under the ordering lock. When the key
    /// space below the current minimum is exhausted, existing rows are
    /// rewritten to gap-spaced keys starting at rank 1.
    pub async fn create_front(pool: &PgPool, input: &NewProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_ordering(&mut tx).await?;

        let (current_min,): (Option<i64>,) = sqlx::query_as("SELECT MIN(sort_key) FROM projects")
            .fetch_one(&mut *tx)
            .await?;

        let key = match ordering::front_insert(current_min) {
            FrontInsert::Key(key) => key,
            FrontInsert::Rebalance => {
                Self::rebalance_from(&mut tx, 1).await?;
                tracing::info!("Rebalanced project ordering keys");
                ordering::rebalanced_key(0)
            }
        };

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO projects
                (title, description, category, client, agency, role, tags, year, duration,
                 featured, created_by, sort_key, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'draft')
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.client)
        .bind(&input.agency)
        .bind(&input.role)
        .bind(&input.tags)
        .bind(input.year)
        .bind(&input.duration)
        .bind(input.featured)
        .bind(input.created_by)
        .bind(key)
        .fetch_one(&mut *tx)
        .await?;

        let project = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(project)
    }

    /// Rewrite every key to `rebalanced_key(first_rank + i)` in current order.
    async fn rebalance_from(conn: &mut PgConnection, first_rank: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects p SET sort_key = ($1 + r.rank) * $2
             FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY sort_key, id) - 1 AS rank
                   FROM projects) r
             WHERE p.id = r.id",
        )
        .bind(first_rank)
        .bind(ordering::ORDER_GAP)
        .execute(conn)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ordering (transaction-bound)
    // -----------------------------------------------------------------------

    /// Take the collection-wide ordering lock for the current transaction.
    pub async fn lock_ordering(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ORDERING_LOCK_KEY)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Lock every project row and return its ordering state.
    pub async fn lock_order_rows(conn: &mut PgConnection) -> Result<Vec<OrderedRow>, sqlx::Error> {
        let rows: Vec<(DbId, i64, i32)> = sqlx::query_as(
            "SELECT id, sort_key, version FROM projects ORDER BY sort_key, id FOR UPDATE",
        )
        .fetch_all(conn)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, sort_key, version)| OrderedRow {
                id,
                sort_key,
                version,
            })
            .collect())
    }

    /// Write new keys in one statement, bumping each row's version.
    pub async fn set_sort_keys(
        conn: &mut PgConnection,
        keys: &[(DbId, i64)],
    ) -> Result<u64, sqlx::Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        let (ids, sort_keys): (Vec<DbId>, Vec<i64>) = keys.iter().copied().unzip();
        let result = sqlx::query(
            "UPDATE projects p SET sort_key = u.sort_key, version = p.version + 1
             FROM UNNEST($1::BIGINT[], $2::BIGINT[]) AS u(id, sort_key)
             WHERE p.id = u.id",
        )
        .bind(&ids)
        .bind(&sort_keys)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Updates (transaction-bound)
    // -----------------------------------------------------------------------

    /// Lock a single project row for the rest of the transaction.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<(ProjectStatus, Option<String>, i32)>, sqlx::Error> {
        let row: Option<(String, Option<String>, i32)> =
            sqlx::query_as("SELECT status, video_url, version FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        let Some((status, video_url, version)) = row else {
            return Ok(None);
        };
        let status =
            ProjectStatus::parse(&status).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Some((status, video_url, version)))
    }

    /// Apply a partial update and bump the version.
    ///
    /// Text fields set to an empty string are cleared. The status, when
    /// present, must already have been validated against the row's video.
    pub async fn apply_patch(
        conn: &mut PgConnection,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = CASE WHEN $3::TEXT IS NULL THEN description ELSE NULLIF($3, '') END,
                category = CASE WHEN $4::TEXT IS NULL THEN category ELSE NULLIF($4, '') END,
                client = CASE WHEN $5::TEXT IS NULL THEN client ELSE NULLIF($5, '') END,
                agency = CASE WHEN $6::TEXT IS NULL THEN agency ELSE NULLIF($6, '') END,
                role = CASE WHEN $7::TEXT IS NULL THEN role ELSE NULLIF($7, '') END,
                tags = COALESCE($8, tags),
                year = COALESCE($9, year),
                duration = CASE WHEN $10::TEXT IS NULL THEN duration ELSE NULLIF($10, '') END,
                featured = COALESCE($11, featured),
                status = COALESCE($12, status),
                version = version + 1
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.category)
        .bind(&patch.client)
        .bind(&patch.agency)
        .bind(&patch.role)
        .bind(&patch.tags)
        .bind(patch.year)
        .bind(&patch.duration)
        .bind(patch.featured)
        .bind(patch.status.map(ProjectStatus::as_str))
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Status and media
    // -----------------------------------------------------------------------

    /// Set the status alone, e.g. while an attach upload is in flight.
    pub async fn set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: ProjectStatus,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET status = $2, version = version + 1 WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store media locations together with the status they allow.
    ///
    /// A thumbnail left as `None` keeps the current one.
    pub async fn attach_media<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        media: &ProjectMedia,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                video_url = $2,
                video_public_id = $3,
                thumbnail_url = COALESCE($4, thumbnail_url),
                thumbnail_public_id = COALESCE($5, thumbnail_public_id),
                status = $6,
                version = version + 1
             WHERE id = $1",
        )
        .bind(id)
        .bind(&media.video_url)
        .bind(&media.video_public_id)
        .bind(&media.thumbnail_url)
        .bind(&media.thumbnail_public_id)
        .bind(media.status.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete a project and its upload records in one transaction.
    ///
    /// Returns the deleted project so the caller can clean up remote media,
    /// or `None` if no row with the given `id` exists.
    pub async fn delete_with_uploads(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(project) = Self::find_by_id(&mut *tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM video_uploads WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(project))
    }
}
