// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'user_submissions' table in the database.
/// One row per quiz attempt.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub quiz_id: i64,
    pub user_name: String,
    pub score: i32,
    pub submitted_at: DateTime<Utc>,
}

/// Represents the 'user_answers' table in the database.
///
/// `is_correct` is copied from the answer at grading time and does not follow
/// later edits of the answer.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserAnswer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub answer_id: i64,
    pub is_correct: bool,
}

/// A graded selection that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub answer_id: i64,
    pub is_correct: bool,
}

/// A user answer joined with its question and the chosen answer option.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserAnswerDetail {
    pub id: i64,
    pub question_id: i64,
    pub question_text: String,
    pub question_type: String,
    pub answer_id: i64,
    pub answer_text: String,
    pub is_correct: bool,
}

/// Response body for a completed attempt.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submission_id: i64,
    pub score: i32,
    pub answers_recorded: usize,
    pub result_url: String,
    pub message: String,
}
