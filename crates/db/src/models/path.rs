//! Learning path entity model and DTO.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A learning path row from the `paths` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Path {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new path.
pub struct CreatePath {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
}
