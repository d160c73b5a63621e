//! Resource entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A resource row from the `resources` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resource {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub url: String,
    pub resource_type: String,
    pub est_minutes: Option<i32>,
    pub is_free: bool,
    pub source_domain: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating (or upserting) a resource.
pub struct CreateResource {
    pub module_id: DbId,
    pub title: String,
    pub url: String,
    pub resource_type: String,
    pub est_minutes: Option<i32>,
    pub is_free: bool,
    pub source_domain: Option<String>,
}

/// A resource joined with its module's position in the path, as returned
/// by the whole-path listing. Path-order traversal sorts by
/// (`module_order`, `id`).
#[derive(Debug, Clone, FromRow)]
pub struct PathResourceRow {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub url: String,
    pub resource_type: String,
    pub est_minutes: Option<i32>,
    pub is_free: bool,
    pub source_domain: Option<String>,
    pub module_order: i32,
}
