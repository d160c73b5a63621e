//! Quiz grading.
//!
//! Questions are multiple-choice with one or more accepted answers. An
//! answer is correct exactly when the submitted option is a member of the
//! question's accepted set; unanswered questions are incorrect. Grading a
//! submission never mutates anything here -- the handler persists the
//! resulting attempt as a new immutable row.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A question as the grader sees it: id plus accepted answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradableQuestion {
    pub question_id: DbId,
    pub accepted: Vec<String>,
}

/// Per-question grading outcome, returned to the caller so results pages
/// can show what was submitted against what was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedAnswer {
    pub question_id: DbId,
    pub submitted: Option<String>,
    pub correct: bool,
    pub accepted: Vec<String>,
}

/// The outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeResult {
    /// Percentage score, rounded to the nearest whole number.
    pub score: u8,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub breakdown: Vec<GradedAnswer>,
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// Percentage score for a graded submission. A quiz with no questions
/// scores zero.
pub fn compute_score(total: usize, correct: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (correct as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Grade a submission against the quiz's questions.
///
/// `answers` maps question id to the submitted option. Answers for
/// question ids the quiz does not contain are ignored.
pub fn grade_quiz(
    questions: &[GradableQuestion],
    answers: &HashMap<DbId, String>,
) -> GradeResult {
    let breakdown: Vec<GradedAnswer> = questions
        .iter()
        .map(|q| {
            let submitted = answers.get(&q.question_id).cloned();
            let correct = submitted
                .as_deref()
                .is_some_and(|a| q.accepted.iter().any(|accepted| accepted == a));
            GradedAnswer {
                question_id: q.question_id,
                submitted,
                correct,
                accepted: q.accepted.clone(),
            }
        })
        .collect();

    let correct_answers = breakdown.iter().filter(|a| a.correct).count();
    GradeResult {
        score: compute_score(questions.len(), correct_answers),
        total_questions: questions.len(),
        correct_answers,
        breakdown,
    }
}

/// Parse a question's stored accepted-answer value.
///
/// The column holds either a JSON array of option strings or a single
/// string for legacy single-answer questions.
pub fn parse_answer_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("accepted answer entry is not a string: {entry}"))
            })
            .collect(),
        Value::String(s) => Ok(vec![s.clone()]),
        other => Err(format!("accepted answers must be a JSON array or string, got: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
