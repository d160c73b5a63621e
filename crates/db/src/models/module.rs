//! Module entity model and DTO.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A module row from the `modules` table. Modules order a path's resources
/// into units via `order_index`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Module {
    pub id: DbId,
    pub path_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new module.
pub struct CreateModule {
    pub path_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
}
