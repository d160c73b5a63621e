//! Repository for the `progress` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::progress::{DoneResource, ProgressRow, WeeklyModuleRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, resource_id, status, last_seen_at, created_at, updated_at";

/// Provides operations on per-user resource progress.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Set the status of one (user, resource) pair, inserting the row on
    /// first touch. Every write refreshes `last_seen_at`.
    pub async fn upsert_status(
        pool: &PgPool,
        user_id: DbId,
        resource_id: DbId,
        status: &str,
    ) -> Result<ProgressRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, resource_id, status, last_seen_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (user_id, resource_id) DO UPDATE SET
                status = EXCLUDED.status,
                last_seen_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRow>(&query)
            .bind(user_id)
            .bind(resource_id)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// All progress rows for a user.
    pub async fn rows_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ProgressRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE user_id = $1");
        sqlx::query_as::<_, ProgressRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's most recently completed resources, newest first.
    pub async fn list_recent_done(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<DoneResource>, sqlx::Error> {
        sqlx::query_as::<_, DoneResource>(
            "SELECT r.id AS resource_id, r.module_id, r.title, r.url, pr.last_seen_at
             FROM progress pr
             JOIN resources r ON r.id = pr.resource_id
             WHERE pr.user_id = $1 AND pr.status = 'DONE'
             ORDER BY pr.last_seen_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Per-module completion aggregates for a user, with display context.
    /// Modules without resources are omitted.
    pub async fn weekly_module_rows(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WeeklyModuleRow>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyModuleRow>(
            "SELECT m.id AS module_id, m.title AS module_title,
                    p.title AS path_title, p.slug AS path_slug,
                    COUNT(r.id) AS total_resources,
                    COUNT(r.id) FILTER (WHERE pr.status = 'DONE') AS done_resources,
                    MAX(pr.last_seen_at) FILTER (WHERE pr.status = 'DONE') AS last_done_at
             FROM modules m
             JOIN paths p ON p.id = m.path_id
             JOIN resources r ON r.module_id = m.id
             LEFT JOIN progress pr ON pr.resource_id = r.id AND pr.user_id = $1
             GROUP BY m.id, m.title, p.title, p.slug",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
