//! Progress tracking computations.
//!
//! Completion state lives in the database as one row per (user, resource).
//! This module holds the pure pieces: status and action vocabulary,
//! completion percentages, next-resource selection, remaining-minutes
//! estimates, and the Monday-anchored weekly goal.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Progress status: resource not started (or explicitly un-done).
pub const STATUS_NOT_STARTED: &str = "NOT_STARTED";
/// Progress status: resource completed.
pub const STATUS_DONE: &str = "DONE";

/// All valid progress status strings.
pub const VALID_PROGRESS_STATUSES: &[&str] = &[STATUS_NOT_STARTED, STATUS_DONE];

/// Toggle action: mark the resource done.
pub const ACTION_DONE: &str = "done";
/// Toggle action: revert the resource to not started.
pub const ACTION_UNDO: &str = "undo";

/// Modules to complete per week for a full goal.
pub const WEEKLY_MODULE_TARGET: u32 = 1;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Completion state of one resource for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted,
    Done,
}

impl ProgressStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_NOT_STARTED => Ok(Self::NotStarted),
            STATUS_DONE => Ok(Self::Done),
            _ => Err(format!(
                "Invalid progress status '{s}'. Must be one of: {}",
                VALID_PROGRESS_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => STATUS_NOT_STARTED,
            Self::Done => STATUS_DONE,
        }
    }
}

/// What a progress toggle request asks for. Anything that is not an
/// explicit undo marks the resource done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    Done,
    Undo,
}

impl ProgressAction {
    /// Interpret the optional `action` field of a toggle request.
    pub fn from_request_value(value: Option<&str>) -> Self {
        match value {
            Some(ACTION_UNDO) => Self::Undo,
            _ => Self::Done,
        }
    }

    /// The status this action writes.
    pub fn target_status(&self) -> ProgressStatus {
        match self {
            Self::Done => ProgressStatus::Done,
            Self::Undo => ProgressStatus::NotStarted,
        }
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// One resource in a path, with the ordering fields needed to pick the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResource {
    pub resource_id: DbId,
    pub module_id: DbId,
    /// The containing module's position within the path.
    pub module_order: i32,
    pub est_minutes: Option<i32>,
}

/// The resource ids a user has completed, out of their progress rows.
pub fn done_set(rows: &[(DbId, ProgressStatus)]) -> HashSet<DbId> {
    rows.iter()
        .filter(|(_, status)| *status == ProgressStatus::Done)
        .map(|(id, _)| *id)
        .collect()
}

/// Completion percentage, rounded to the nearest whole number and capped
/// at 100. Zero resources means zero percent.
pub fn compute_completion_pct(total: usize, done: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// The first not-done resource in path order: modules by position, then
/// resources by id within each module.
pub fn next_resource(resources: &[PathResource], done: &HashSet<DbId>) -> Option<DbId> {
    let mut ordered: Vec<&PathResource> = resources.iter().collect();
    ordered.sort_by_key(|r| (r.module_order, r.resource_id));
    ordered
        .iter()
        .find(|r| !done.contains(&r.resource_id))
        .map(|r| r.resource_id)
}

/// Estimated minutes left on a path. Resources without an estimate count
/// as zero.
pub fn remaining_minutes(resources: &[PathResource], done: &HashSet<DbId>) -> i64 {
    resources
        .iter()
        .filter(|r| !done.contains(&r.resource_id))
        .map(|r| i64::from(r.est_minutes.unwrap_or(0)))
        .sum()
}

// ---------------------------------------------------------------------------
// Weekly goal
// ---------------------------------------------------------------------------

/// A half-open week in the user's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// Monday 00:00.
    pub start: NaiveDateTime,
    /// The following Monday 00:00 (exclusive).
    pub end: NaiveDateTime,
}

impl WeekWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

/// The ISO week containing the given local time.
pub fn week_window(now_local: NaiveDateTime) -> WeekWindow {
    let days_from_monday = now_local.date().weekday().num_days_from_monday();
    let monday = now_local.date() - Duration::days(i64::from(days_from_monday));
    let start = monday.and_time(NaiveTime::MIN);
    WeekWindow {
        start,
        end: start + Duration::days(7),
    }
}

/// Per-module completion aggregate for one user, as loaded from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCompletion {
    pub module_id: DbId,
    pub total_resources: i64,
    pub done_resources: i64,
    /// Most recent completion timestamp among the module's done resources.
    pub last_done_at: Option<Timestamp>,
}

/// A module counted toward the weekly goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedModule {
    pub module_id: DbId,
    pub completed_at: Timestamp,
}

/// Weekly goal summary for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyGoal {
    pub target: u32,
    pub completed: usize,
    pub percent: u8,
    /// Modules finished this week, most recent first.
    pub modules: Vec<CompletedModule>,
}

/// Goal percentage, capped at 100 so overachieving weeks stay readable.
pub fn compute_goal_pct(target: u32, completed: usize) -> u8 {
    if target == 0 {
        return 0;
    }
    let pct = (completed as f64 / f64::from(target) * 100.0).round();
    pct.min(100.0) as u8
}

/// Count the modules a user finished inside the current local week.
///
/// A module counts when it has at least one resource, every resource is
/// done, and the latest completion falls inside the week. The completion
/// instant is the module's most recent done timestamp, converted to the
/// user's timezone before the window check.
pub fn compute_weekly_goal<Tz: TimeZone>(
    modules: &[ModuleCompletion],
    now: Timestamp,
    tz: &Tz,
) -> (WeeklyGoal, WeekWindow) {
    let window = week_window(now.with_timezone(tz).naive_local());

    let mut completed: Vec<CompletedModule> = modules
        .iter()
        .filter(|m| m.total_resources > 0 && m.done_resources == m.total_resources)
        .filter_map(|m| {
            let at = m.last_done_at?;
            window
                .contains(at.with_timezone(tz).naive_local())
                .then_some(CompletedModule {
                    module_id: m.module_id,
                    completed_at: at,
                })
        })
        .collect();
    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    let count = completed.len();
    let goal = WeeklyGoal {
        target: WEEKLY_MODULE_TARGET,
        completed: count,
        percent: compute_goal_pct(WEEKLY_MODULE_TARGET, count),
        modules: completed,
    };
    (goal, window)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
