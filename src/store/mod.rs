// src/store/mod.rs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        event::{CreateEventRequest, Event},
        question::{Answer, CreateQuestionRequest, QuestionWithAnswers},
        quiz::{CreateQuizRequest, Quiz, QuizSummary},
        submission::{GradedAnswer, Submission, UserAnswer, UserAnswerDetail},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence seam for the catalog (quizzes, questions, answers, events)
/// and for submissions with their recorded answers.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Quizzes newest first, with their question counts.
    async fn list_quizzes(&self, limit: Option<i64>) -> Result<Vec<QuizSummary>, AppError>;

    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError>;

    async fn count_questions(&self, quiz_id: i64) -> Result<i64, AppError>;

    /// Questions of a quiz in id order, each with its answers in id order.
    async fn questions_with_answers(&self, quiz_id: i64)
    -> Result<Vec<QuestionWithAnswers>, AppError>;

    async fn create_quiz(&self, req: &CreateQuizRequest) -> Result<Quiz, AppError>;

    /// Creates a question and its inline answers atomically.
    /// Fails with `NotFound` if the quiz does not exist.
    async fn create_question(
        &self,
        quiz_id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<QuestionWithAnswers, AppError>;

    /// Events dated at or after `now`, soonest first.
    async fn upcoming_events(
        &self,
        now: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, AppError>;

    /// Events dated before `now`, oldest first.
    async fn past_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError>;

    async fn create_event(&self, req: &CreateEventRequest) -> Result<Event, AppError>;

    /// Creates a submission shell with score 0.
    async fn create_submission(&self, quiz_id: i64, user_name: &str)
    -> Result<Submission, AppError>;

    /// Stores the final score and the graded answers of a submission in one unit.
    /// Returns the persisted answers in insertion order.
    async fn finalize_submission(
        &self,
        submission_id: i64,
        score: i32,
        records: &[GradedAnswer],
    ) -> Result<Vec<UserAnswer>, AppError>;

    /// Removes a submission together with its recorded answers.
    async fn delete_submission(&self, id: i64) -> Result<(), AppError>;

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>, AppError>;

    /// Answers of a submission joined with question and answer text, in creation order.
    async fn submission_answers(
        &self,
        submission_id: i64,
    ) -> Result<Vec<UserAnswerDetail>, AppError>;

    /// Currently correct answers of the given questions, in id order.
    async fn correct_answers(&self, question_ids: &[i64]) -> Result<Vec<Answer>, AppError>;
}
