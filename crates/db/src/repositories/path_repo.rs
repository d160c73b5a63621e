//! Repository for the `paths` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::path::{CreatePath, Path};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, description, is_published, created_at, updated_at";

/// Provides CRUD operations for learning paths.
pub struct PathRepo;

impl PathRepo {
    /// Insert a new path, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePath) -> Result<Path, sqlx::Error> {
        let query = format!(
            "INSERT INTO paths (slug, title, description, is_published)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Path>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find a path by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Path>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM paths WHERE id = $1");
        sqlx::query_as::<_, Path>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a path by its URL slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Path>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM paths WHERE slug = $1");
        sqlx::query_as::<_, Path>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List published paths in catalog order (oldest first).
    pub async fn list_published(pool: &PgPool) -> Result<Vec<Path>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM paths WHERE is_published = true ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Path>(&query).fetch_all(pool).await
    }

    /// List published paths newest first, for the dashboard.
    pub async fn list_published_newest_first(pool: &PgPool) -> Result<Vec<Path>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM paths WHERE is_published = true ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Path>(&query).fetch_all(pool).await
    }
}
