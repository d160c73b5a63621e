//! Handlers for the path catalog: listing and path detail.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use waymark_core::error::CoreError;
use waymark_core::progress::{
    compute_completion_pct, done_set, next_resource, PathResource, ProgressStatus,
};
use waymark_core::types::DbId;
use waymark_db::models::resource::PathResourceRow;
use waymark_db::repositories::{ModuleRepo, PathRepo, ProgressRepo, ResourceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Per-path completion summary.
#[derive(Debug, Serialize)]
pub struct PathProgress {
    pub percent: u8,
    pub done: usize,
    pub total: usize,
    /// External URL of the next unfinished resource in path order, if any.
    pub next_url: Option<String>,
}

/// One catalog entry in the path listing.
#[derive(Debug, Serialize)]
pub struct PathSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub modules_count: i64,
    /// Present only for authenticated callers.
    pub progress: Option<PathProgress>,
}

/// Per-module slice of the completion picture on the detail page.
#[derive(Debug, Serialize)]
pub struct ModuleProgress {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

/// A resource as rendered on the path detail page.
#[derive(Debug, Serialize)]
pub struct ResourceView {
    pub id: DbId,
    pub title: String,
    pub url: String,
    pub resource_type: String,
    pub est_minutes: Option<i32>,
    pub is_free: bool,
    pub source_domain: Option<String>,
    pub done: bool,
}

/// A module with its resources and progress.
#[derive(Debug, Serialize)]
pub struct ModuleView {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub progress: ModuleProgress,
    pub resources: Vec<ResourceView>,
}

/// Full path detail response.
#[derive(Debug, Serialize)]
pub struct PathDetail {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    /// Whole-path completion. Zeros for anonymous callers.
    pub overall: PathProgress,
    pub next_resource_id: Option<DbId>,
    pub modules: Vec<ModuleView>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/paths
///
/// Published paths in catalog order. Authenticated callers get their
/// completion summary per path; anonymous callers get `progress: null`.
pub async fn list_paths(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<PathSummary>>>> {
    let paths = PathRepo::list_published(&state.pool).await?;

    // One progress load covers every path below.
    let done = match &user {
        Some(u) => user_done_set(&state.pool, u.user_id).await?,
        None => HashSet::new(),
    };

    let mut summaries = Vec::with_capacity(paths.len());
    for path in paths {
        let modules_count = ModuleRepo::count_by_path(&state.pool, path.id).await?;
        let progress = if user.is_some() {
            let rows = ResourceRepo::list_by_path(&state.pool, path.id).await?;
            Some(path_progress(&rows, &done))
        } else {
            None
        };
        summaries.push(PathSummary {
            id: path.id,
            title: path.title,
            slug: path.slug,
            description: path.description,
            modules_count,
            progress,
        });
    }

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/paths/{slug}
///
/// One path with its modules, resources and the caller's completion state.
/// Unpublished paths stay reachable by direct link; only a missing slug is
/// a 404.
pub async fn get_path(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PathDetail>>> {
    // 1. Resolve the path.
    let path = PathRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundKey {
            entity: "Path",
            key: slug,
        }))?;

    // 2. Load content and the caller's done set (empty for guests).
    let modules = ModuleRepo::list_by_path(&state.pool, path.id).await?;
    let rows = ResourceRepo::list_by_path(&state.pool, path.id).await?;
    let done = match &user {
        Some(u) => user_done_set(&state.pool, u.user_id).await?,
        None => HashSet::new(),
    };

    // 3. Assemble per-module views in path order.
    let mut module_views = Vec::with_capacity(modules.len());
    for module in &modules {
        let module_rows: Vec<&PathResourceRow> =
            rows.iter().filter(|r| r.module_id == module.id).collect();
        let total = module_rows.len();
        let done_count = module_rows.iter().filter(|r| done.contains(&r.id)).count();

        let resources = module_rows
            .iter()
            .map(|r| ResourceView {
                id: r.id,
                title: r.title.clone(),
                url: r.url.clone(),
                resource_type: r.resource_type.clone(),
                est_minutes: r.est_minutes,
                is_free: r.is_free,
                source_domain: r.source_domain.clone(),
                done: done.contains(&r.id),
            })
            .collect();

        module_views.push(ModuleView {
            id: module.id,
            title: module.title.clone(),
            description: module.description.clone(),
            order_index: module.order_index,
            progress: ModuleProgress {
                done: done_count,
                total,
                percent: compute_completion_pct(total, done_count),
            },
            resources,
        });
    }

    // 4. Overall completion and the continue target.
    let next_resource_id = next_resource(&to_path_resources(&rows), &done);

    Ok(Json(DataResponse {
        data: PathDetail {
            id: path.id,
            slug: path.slug,
            title: path.title,
            description: path.description,
            is_published: path.is_published,
            overall: path_progress(&rows, &done),
            next_resource_id,
            modules: module_views,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The ids of every resource the user has completed, across all paths.
pub(crate) async fn user_done_set(
    pool: &PgPool,
    user_id: DbId,
) -> Result<HashSet<DbId>, AppError> {
    let rows = ProgressRepo::rows_for_user(pool, user_id).await?;
    let pairs: Vec<(DbId, ProgressStatus)> = rows
        .iter()
        .filter_map(|r| {
            ProgressStatus::from_str_value(&r.status)
                .ok()
                .map(|status| (r.resource_id, status))
        })
        .collect();
    Ok(done_set(&pairs))
}

/// Convert loaded resource rows into the ordering shape progress math takes.
pub(crate) fn to_path_resources(rows: &[PathResourceRow]) -> Vec<PathResource> {
    rows.iter()
        .map(|r| PathResource {
            resource_id: r.id,
            module_id: r.module_id,
            module_order: r.module_order,
            est_minutes: r.est_minutes,
        })
        .collect()
}

/// Completion summary over one path's resources.
fn path_progress(rows: &[PathResourceRow], done: &HashSet<DbId>) -> PathProgress {
    let done_count = rows.iter().filter(|r| done.contains(&r.id)).count();
    let next_url = next_resource(&to_path_resources(rows), done)
        .and_then(|id| rows.iter().find(|r| r.id == id))
        .map(|r| r.url.clone());
    PathProgress {
        percent: compute_completion_pct(rows.len(), done_count),
        done: done_count,
        total: rows.len(),
        next_url,
    }
}
