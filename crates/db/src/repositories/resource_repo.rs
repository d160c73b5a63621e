//! Repository for the `resources` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::resource::{CreateResource, PathResourceRow, Resource};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, module_id, title, url, resource_type, est_minutes, is_free, \
                        source_domain, created_at, updated_at";

/// Provides CRUD operations for resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateResource) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (module_id, title, url, resource_type, est_minutes, is_free, source_domain)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(input.module_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(&input.resource_type)
            .bind(input.est_minutes)
            .bind(input.is_free)
            .bind(&input.source_domain)
            .fetch_one(pool)
            .await
    }

    /// Insert a resource, or refresh the existing row keyed by
    /// (module, url). Backs idempotent content imports.
    pub async fn upsert(pool: &PgPool, input: &CreateResource) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (module_id, title, url, resource_type, est_minutes, is_free, source_domain)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (module_id, url) DO UPDATE SET
                title = EXCLUDED.title,
                resource_type = EXCLUDED.resource_type,
                est_minutes = EXCLUDED.est_minutes,
                is_free = EXCLUDED.is_free,
                source_domain = EXCLUDED.source_domain
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(input.module_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(&input.resource_type)
            .bind(input.est_minutes)
            .bind(input.is_free)
            .bind(&input.source_domain)
            .fetch_one(pool)
            .await
    }

    /// Fetch a single resource by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a module's resources in display order.
    pub async fn list_by_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE module_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Resource>(&query)
            .bind(module_id)
            .fetch_all(pool)
            .await
    }

    /// List every resource in a path, joined with the containing module's
    /// position and ordered for path traversal.
    pub async fn list_by_path(
        pool: &PgPool,
        path_id: DbId,
    ) -> Result<Vec<PathResourceRow>, sqlx::Error> {
        sqlx::query_as::<_, PathResourceRow>(
            "SELECT r.id, r.module_id, r.title, r.url, r.resource_type, r.est_minutes,
                    r.is_free, r.source_domain, m.order_index AS module_order
             FROM resources r
             JOIN modules m ON m.id = r.module_id
             WHERE m.path_id = $1
             ORDER BY m.order_index ASC, r.id ASC",
        )
        .bind(path_id)
        .fetch_all(pool)
        .await
    }
}
