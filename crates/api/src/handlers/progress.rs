//! Handlers for progress tracking: the toggle endpoint and the dashboard.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use waymark_core::error::CoreError;
use waymark_core::progress::{
    compute_completion_pct, compute_weekly_goal, next_resource, remaining_minutes,
    ModuleCompletion, ProgressAction,
};
use waymark_core::types::{DbId, Timestamp};
use waymark_db::models::progress::DoneResource;
use waymark_db::models::user::UserResponse;
use waymark_db::repositories::{PathRepo, ProgressRepo, ResourceRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::catalog::{to_path_resources, user_done_set};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many completed resources the dashboard activity feed shows.
const RECENT_DONE_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /progress`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub resource_id: DbId,
    /// `"undo"` reverts to not-started; anything else (or absent) marks done.
    pub action: Option<String>,
    /// Where to send non-JSON clients afterwards.
    pub redirect_to: Option<String>,
}

/// JSON acknowledgement for a progress toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    /// The status the resource now has.
    pub status: String,
}

/// One path on the dashboard, with time remaining.
#[derive(Debug, Serialize)]
pub struct DashboardPath {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub progress: DashboardProgress,
    pub next_url: Option<String>,
}

/// Completion summary for a dashboard path.
#[derive(Debug, Serialize)]
pub struct DashboardProgress {
    pub percent: u8,
    pub done: usize,
    pub total: usize,
    pub remaining_minutes: i64,
}

/// A module counted toward this week's goal, with display context.
#[derive(Debug, Serialize)]
pub struct WeeklyModuleView {
    pub module_id: DbId,
    pub module_title: String,
    pub path_title: String,
    pub path_slug: String,
    pub completed_at: Timestamp,
}

/// Weekly goal block of the dashboard.
#[derive(Debug, Serialize)]
pub struct WeeklyGoalView {
    pub target: u32,
    pub completed: usize,
    pub percent: u8,
    pub modules: Vec<WeeklyModuleView>,
    pub week_start: NaiveDateTime,
    pub week_end: NaiveDateTime,
}

/// Response body for `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub recent_done: Vec<DoneResource>,
    /// Paths the user has started, newest first.
    pub paths: Vec<DashboardPath>,
    pub weekly_goal: WeeklyGoalView,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/progress
///
/// Toggle one resource's completion state for the calling user. JSON
/// clients (by `Accept` or `X-Requested-With`) get an acknowledgement;
/// everything else gets a redirect back to where it came from.
pub async fn toggle(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    Json(input): Json<ToggleRequest>,
) -> AppResult<Response> {
    // 1. The resource must exist; a dangling id is the caller's bug.
    ResourceRepo::find_by_id(&state.pool, input.resource_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id: input.resource_id,
        }))?;

    // 2. Write the requested status.
    let action = ProgressAction::from_request_value(input.action.as_deref());
    let status = action.target_status().as_str();
    ProgressRepo::upsert_status(&state.pool, user.user_id, input.resource_id, status).await?;

    // 3. Answer in the shape the client asked for.
    if wants_json(&headers) {
        return Ok(Json(ToggleResponse {
            success: true,
            status: status.to_string(),
        })
        .into_response());
    }

    let target = input
        .redirect_to
        .or_else(|| {
            headers
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&target).into_response())
}

/// GET /api/v1/me
///
/// The dashboard: recent activity, started paths with time remaining, and
/// the weekly module goal.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    // 1. Load the full user row for the profile block.
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

    // 2. Recent completions.
    let recent_done =
        ProgressRepo::list_recent_done(&state.pool, user.id, RECENT_DONE_LIMIT).await?;

    // 3. Started paths, newest first, with remaining-minutes estimates.
    let done = user_done_set(&state.pool, user.id).await?;
    let mut paths = Vec::new();
    for path in PathRepo::list_published_newest_first(&state.pool).await? {
        let rows = ResourceRepo::list_by_path(&state.pool, path.id).await?;
        let resources = to_path_resources(&rows);
        let done_count = rows.iter().filter(|r| done.contains(&r.id)).count();
        if done_count == 0 {
            continue;
        }
        let next_url = next_resource(&resources, &done)
            .and_then(|id| rows.iter().find(|r| r.id == id))
            .map(|r| r.url.clone());
        paths.push(DashboardPath {
            id: path.id,
            title: path.title,
            slug: path.slug,
            progress: DashboardProgress {
                percent: compute_completion_pct(rows.len(), done_count),
                done: done_count,
                total: rows.len(),
                remaining_minutes: remaining_minutes(&resources, &done),
            },
            next_url,
        });
    }

    // 4. Weekly goal over the user's local calendar week.
    let module_rows = ProgressRepo::weekly_module_rows(&state.pool, user.id).await?;
    let completions: Vec<ModuleCompletion> = module_rows
        .iter()
        .map(|m| ModuleCompletion {
            module_id: m.module_id,
            total_resources: m.total_resources,
            done_resources: m.done_resources,
            last_done_at: m.last_done_at,
        })
        .collect();
    let (goal, window) = compute_weekly_goal(&completions, Utc::now(), &chrono::Local);

    let modules = goal
        .modules
        .iter()
        .filter_map(|completed| {
            module_rows
                .iter()
                .find(|m| m.module_id == completed.module_id)
                .map(|m| WeeklyModuleView {
                    module_id: m.module_id,
                    module_title: m.module_title.clone(),
                    path_title: m.path_title.clone(),
                    path_slug: m.path_slug.clone(),
                    completed_at: completed.completed_at,
                })
        })
        .collect();

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(&user),
            recent_done,
            paths,
            weekly_goal: WeeklyGoalView {
                target: goal.target,
                completed: goal.completed,
                percent: goal.percent,
                modules,
                week_start: window.start,
                week_end: window.end,
            },
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether the client wants a JSON answer rather than a redirect.
fn wants_json(headers: &HeaderMap) -> bool {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let requested_with = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "XMLHttpRequest");
    accepts_json || requested_with
}
