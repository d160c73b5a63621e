//! Handlers for the quiz surface: listing, summary, taking and grading.
//!
//! Quizzes are entitlement-gated. The listing and summary are visible to any
//! logged-in user (the summary says whether access exists); the questions
//! and the grader are not reachable without an active bundle for the quiz's
//! path or premium membership.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use waymark_core::entitlement::{has_quiz_access, purchased_path_ids, PurchaseSnapshot};
use waymark_core::error::CoreError;
use waymark_core::grading::{grade_quiz, parse_answer_list, GradableQuestion, GradedAnswer};
use waymark_core::payments::PurchaseKind;
use waymark_core::types::{DbId, Timestamp};
use waymark_db::models::module::Module;
use waymark_db::models::quiz::Quiz;
use waymark_db::models::quiz_attempt::{CreateQuizAttempt, QuizAttempt};
use waymark_db::models::quiz_purchase::QuizPurchase;
use waymark_db::repositories::{
    ModuleRepo, PathRepo, QuestionRepo, QuizAttemptRepo, QuizPurchaseRepo, QuizRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many past attempts the quiz summary shows.
const ATTEMPT_HISTORY_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A quiz without its questions.
#[derive(Debug, Serialize)]
pub struct QuizView {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            module_id: quiz.module_id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            question_count: quiz.question_count,
        }
    }
}

/// A past attempt reduced to its headline numbers.
#[derive(Debug, Serialize)]
pub struct AttemptSummary {
    pub id: DbId,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub completed_at: Timestamp,
}

impl From<&QuizAttempt> for AttemptSummary {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            correct_answers: attempt.correct_answers,
            completed_at: attempt.completed_at,
        }
    }
}

/// One row of the quiz listing.
#[derive(Debug, Serialize)]
pub struct QuizListingEntry {
    pub id: DbId,
    pub title: String,
    pub module_id: DbId,
    pub module_title: String,
    pub path_id: DbId,
    pub path_title: String,
    pub question_count: i32,
    pub last_attempt: Option<AttemptSummary>,
}

/// Response body for `GET /quizzes`.
#[derive(Debug, Serialize)]
pub struct QuizzesResponse {
    pub quizzes: Vec<QuizListingEntry>,
    pub premium: bool,
}

/// The module a quiz belongs to, with path context for breadcrumbs.
#[derive(Debug, Serialize)]
pub struct ModuleContext {
    pub id: DbId,
    pub title: String,
    pub path_id: DbId,
    pub path_title: String,
    pub path_slug: String,
}

/// Response body for the quiz summary.
#[derive(Debug, Serialize)]
pub struct QuizSummaryResponse {
    pub quiz: QuizView,
    pub module: ModuleContext,
    pub has_access: bool,
    pub is_premium: bool,
    pub attempts: Vec<AttemptSummary>,
}

/// A question as shown while taking a quiz. Never carries the accepted
/// answers or the explanation.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub options: Value,
    pub order_index: i32,
}

/// Response body for the take endpoint.
#[derive(Debug, Serialize)]
pub struct QuizTakeResponse {
    pub quiz: QuizView,
    pub questions: Vec<QuestionView>,
}

/// Request body for a quiz submission. Keys are question ids.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: HashMap<DbId, String>,
}

/// Response body for a graded submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub attempt_id: DbId,
    pub score: u8,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub breakdown: Vec<GradedAnswer>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/quizzes
///
/// The quizzes the caller can open: all of them for premium users, those on
/// purchased paths otherwise. Each entry carries the caller's latest
/// attempt.
pub async fn list_quizzes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<QuizzesResponse>>> {
    // 1. Work out which quizzes the caller is entitled to.
    let rows = if user.is_premium {
        QuizRepo::list_with_context(&state.pool).await?
    } else {
        let purchases = QuizPurchaseRepo::list_active_for_user(&state.pool, user.user_id).await?;
        let path_ids: Vec<DbId> = purchased_path_ids(&to_snapshots(&purchases))
            .into_iter()
            .collect();
        if path_ids.is_empty() {
            Vec::new()
        } else {
            QuizRepo::list_with_context_for_paths(&state.pool, &path_ids).await?
        }
    };

    // 2. Attach the latest attempt per quiz.
    let latest: HashMap<DbId, QuizAttempt> =
        QuizAttemptRepo::latest_per_quiz(&state.pool, user.user_id)
            .await?
            .into_iter()
            .map(|a| (a.quiz_id, a))
            .collect();

    let quizzes = rows
        .into_iter()
        .map(|row| QuizListingEntry {
            last_attempt: latest.get(&row.id).map(AttemptSummary::from),
            id: row.id,
            title: row.title,
            module_id: row.module_id,
            module_title: row.module_title,
            path_id: row.path_id,
            path_title: row.path_title,
            question_count: row.question_count,
        })
        .collect();

    Ok(Json(DataResponse {
        data: QuizzesResponse {
            quizzes,
            premium: user.is_premium,
        },
    }))
}

/// GET /api/v1/modules/{module_id}/quiz
///
/// Quiz summary for a module: metadata, whether the caller has access, and
/// their recent attempts. Visible without entitlement so the page can offer
/// the purchase.
pub async fn quiz_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(module_id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuizSummaryResponse>>> {
    let (module, quiz) = resolve_module_quiz(&state.pool, module_id).await?;
    let path = PathRepo::find_by_id(&state.pool, module.path_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Path",
            id: module.path_id,
        }))?;

    let has_access = quiz_access(&state.pool, &user, module.path_id).await?;
    let attempts = QuizAttemptRepo::list_recent(
        &state.pool,
        user.user_id,
        quiz.id,
        ATTEMPT_HISTORY_LIMIT,
    )
    .await?;

    Ok(Json(DataResponse {
        data: QuizSummaryResponse {
            quiz: QuizView::from(&quiz),
            module: ModuleContext {
                id: module.id,
                title: module.title,
                path_id: path.id,
                path_title: path.title,
                path_slug: path.slug,
            },
            has_access,
            is_premium: user.is_premium,
            attempts: attempts.iter().map(AttemptSummary::from).collect(),
        },
    }))
}

/// GET /api/v1/modules/{module_id}/quiz/take
///
/// The quiz's questions, stripped of answers. Requires entitlement.
pub async fn take_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(module_id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuizTakeResponse>>> {
    let (module, quiz) = resolve_module_quiz(&state.pool, module_id).await?;
    if !quiz_access(&state.pool, &user, module.path_id).await? {
        return Err(AppError::Core(CoreError::Forbidden("No access".into())));
    }

    let questions = QuestionRepo::list_by_quiz(&state.pool, quiz.id)
        .await?
        .into_iter()
        .map(|q| QuestionView {
            id: q.id,
            question_text: q.question_text,
            question_type: q.question_type,
            options: q.options,
            order_index: q.order_index,
        })
        .collect();

    Ok(Json(DataResponse {
        data: QuizTakeResponse {
            quiz: QuizView::from(&quiz),
            questions,
        },
    }))
}

/// POST /api/v1/modules/{module_id}/quiz/submit
///
/// Grade a submission and record the attempt. Requires entitlement.
pub async fn submit_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(module_id): Path<DbId>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<DataResponse<SubmitResponse>>> {
    // 1. Resolve and gate.
    let (module, quiz) = resolve_module_quiz(&state.pool, module_id).await?;
    if !quiz_access(&state.pool, &user, module.path_id).await? {
        return Err(AppError::Core(CoreError::Forbidden("No access".into())));
    }

    // 2. Build the gradable question set. A question whose stored answer
    //    list does not parse is never correct; the row needs fixing, the
    //    submission should still grade.
    let questions = QuestionRepo::list_by_quiz(&state.pool, quiz.id).await?;
    let gradable: Vec<GradableQuestion> = questions
        .iter()
        .map(|q| {
            let accepted = match parse_answer_list(&q.correct_answer) {
                Ok(accepted) => accepted,
                Err(reason) => {
                    tracing::warn!(question_id = q.id, %reason, "Unparseable accepted answers");
                    Vec::new()
                }
            };
            GradableQuestion {
                question_id: q.id,
                accepted,
            }
        })
        .collect();

    // 3. Grade and persist the attempt.
    let grade = grade_quiz(&gradable, &input.answers);
    let answers = serde_json::to_value(&grade.breakdown)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize breakdown: {e}")))?;
    let attempt = QuizAttemptRepo::create(
        &state.pool,
        &CreateQuizAttempt {
            user_id: user.user_id,
            quiz_id: quiz.id,
            score: i32::from(grade.score),
            total_questions: grade.total_questions as i32,
            correct_answers: grade.correct_answers as i32,
            answers,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        quiz_id = quiz.id,
        score = grade.score,
        "Quiz attempt recorded"
    );

    Ok(Json(DataResponse {
        data: SubmitResponse {
            attempt_id: attempt.id,
            score: grade.score,
            total_questions: grade.total_questions,
            correct_answers: grade.correct_answers,
            breakdown: grade.breakdown,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a module and its quiz, or 404.
async fn resolve_module_quiz(pool: &PgPool, module_id: DbId) -> Result<(Module, Quiz), AppError> {
    let module = ModuleRepo::find_by_id(pool, module_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id: module_id,
        }))?;
    let quiz = QuizRepo::find_by_module(pool, module.id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Quiz",
                key: module.title.clone(),
            })
        })?;
    Ok((module, quiz))
}

/// Whether the caller may open quizzes on the given path.
async fn quiz_access(pool: &PgPool, user: &AuthUser, path_id: DbId) -> Result<bool, AppError> {
    let purchases = QuizPurchaseRepo::list_active_for_user(pool, user.user_id).await?;
    Ok(has_quiz_access(
        user.is_premium,
        &to_snapshots(&purchases),
        path_id,
    ))
}

/// Reduce purchase rows to the shape entitlement checks take. Rows with an
/// unknown purchase type are skipped.
fn to_snapshots(purchases: &[QuizPurchase]) -> Vec<PurchaseSnapshot> {
    purchases
        .iter()
        .filter_map(|p| {
            PurchaseKind::from_str_value(&p.purchase_type)
                .ok()
                .map(|kind| PurchaseSnapshot {
                    kind,
                    path_id: p.path_id,
                    is_active: p.is_active,
                })
        })
        .collect()
}
