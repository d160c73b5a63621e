//! Repository for the `modules` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::module::{CreateModule, Module};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, path_id, title, description, order_index, created_at, updated_at";

/// Provides CRUD operations for modules.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a new module, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateModule) -> Result<Module, sqlx::Error> {
        let query = format!(
            "INSERT INTO modules (path_id, title, description, order_index)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(input.path_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a module by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a path's modules in path order.
    pub async fn list_by_path(pool: &PgPool, path_id: DbId) -> Result<Vec<Module>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM modules WHERE path_id = $1 ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(path_id)
            .fetch_all(pool)
            .await
    }

    /// Count a path's modules.
    pub async fn count_by_path(pool: &PgPool, path_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM modules WHERE path_id = $1")
            .bind(path_id)
            .fetch_one(pool)
            .await
    }
}
