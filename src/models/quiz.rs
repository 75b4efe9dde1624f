// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quiz row joined with the number of questions it owns.
/// Used by the listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub question_count: i64,
}

impl QuizSummary {
    pub fn new(quiz: Quiz, question_count: i64) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            created_at: quiz.created_at,
            question_count,
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 20000))]
    #[serde(default)]
    pub description: String,
}
