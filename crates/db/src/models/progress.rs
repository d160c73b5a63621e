//! Progress models and joined read shapes.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A progress row from the `progress` table: one per (user, resource) once
/// the user has touched the resource. Rows are toggled, never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressRow {
    pub id: DbId,
    pub user_id: DbId,
    pub resource_id: DbId,
    pub status: String,
    pub last_seen_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A completed resource joined with its resource fields, for the recent
/// activity feed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DoneResource {
    pub resource_id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub url: String,
    pub last_seen_at: Timestamp,
}

/// Per-module completion aggregate for one user, joined with display
/// context. Modules without resources are not returned.
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyModuleRow {
    pub module_id: DbId,
    pub module_title: String,
    pub path_title: String,
    pub path_slug: String,
    pub total_resources: i64,
    pub done_resources: i64,
    pub last_done_at: Option<Timestamp>,
}
