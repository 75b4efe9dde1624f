// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Question kind shown to the quiz taker.
///
/// Only affects how the form is rendered (radio vs. checkbox). Grading applies
/// the same one-point-per-question rule to both kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Single,
    Multiple,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    /// The text content of the question.
    pub text: String,

    /// 'single' or 'multiple'.
    /// Mapped from the database column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    pub question_type: String,

    pub created_at: DateTime<Utc>,
}

/// Represents the 'answers' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// A question together with its answer options, in id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

impl QuestionWithAnswers {
    /// Finds one of this question's own answers by id.
    pub fn answer(&self, answer_id: i64) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}

/// DTO for sending an answer option to the quiz taker (excludes `is_correct`).
#[derive(Debug, Serialize)]
pub struct PublicAnswer {
    pub id: i64,
    pub text: String,
}

/// DTO for sending a question to the quiz taker.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: String,
    pub text: String,
    /// Name of the form field carrying the selections for this question.
    pub field: String,
    pub answers: Vec<PublicAnswer>,
}

impl From<QuestionWithAnswers> for PublicQuestion {
    fn from(qa: QuestionWithAnswers) -> Self {
        Self {
            id: qa.question.id,
            question_type: qa.question.question_type,
            text: qa.question.text,
            field: format!("question_{}", qa.question.id),
            answers: qa
                .answers
                .into_iter()
                .map(|a| PublicAnswer { id: a.id, text: a.text })
                .collect(),
        }
    }
}

/// DTO for one inline answer option when creating a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnswerRequest {
    #[validate(length(min = 1, max = 200))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating a new question with its answers.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[serde(default, rename = "type")]
    pub question_type: QuestionType,
    #[validate(nested)]
    #[serde(default)]
    pub answers: Vec<CreateAnswerRequest>,
}
