// src/store/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    config::Config,
    error::AppError,
    models::{
        event::{CreateEventRequest, Event},
        question::{Answer, CreateQuestionRequest, Question, QuestionWithAnswers},
        quiz::{CreateQuizRequest, Quiz, QuizSummary},
        submission::{GradedAnswer, Submission, UserAnswer, UserAnswerDetail},
    },
    store::QuizStore,
};

const CONNECT_RETRIES: u32 = 5;

/// `QuizStore` backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with retry, then applies pending migrations.
    pub async fn connect(config: &Config, database_url: &str) -> Result<Self, AppError> {
        let mut retry_count = 0;
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(3))
                .connect(database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    retry_count += 1;
                    if retry_count > CONNECT_RETRIES {
                        return Err(AppError::InternalServerError(format!(
                            "Failed to connect to database after {} retries: {}",
                            CONNECT_RETRIES, e
                        )));
                    }
                    tracing::warn!(
                        "Database not ready, retrying in 2s... (Attempt {})",
                        retry_count
                    );
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        };

        tracing::info!("Database connected...");

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl QuizStore for PgStore {
    async fn list_quizzes(&self, limit: Option<i64>) -> Result<Vec<QuizSummary>, AppError> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT q.id, q.title, q.description, q.created_at, COUNT(qs.id) AS question_count
            FROM quizzes q
            LEFT JOIN questions qs ON qs.quiz_id = q.id
            GROUP BY q.id
            ORDER BY q.created_at DESC, q.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(quizzes)
    }

    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, created_at, updated_at FROM quizzes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn count_questions(&self, quiz_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn questions_with_answers(
        &self,
        quiz_id: i64,
    ) -> Result<Vec<QuestionWithAnswers>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, type, created_at
            FROM questions
            WHERE quiz_id = $1
            ORDER BY id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, text, is_correct
            FROM answers
            WHERE question_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&question_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions
            .into_iter()
            .map(|question| {
                let answers = answers
                    .iter()
                    .filter(|a| a.question_id == question.id)
                    .cloned()
                    .collect();
                QuestionWithAnswers { question, answers }
            })
            .collect())
    }

    async fn create_quiz(&self, req: &CreateQuizRequest) -> Result<Quiz, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(quiz)
    }

    async fn create_question(
        &self,
        quiz_id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<QuestionWithAnswers, AppError> {
        let mut tx = self.pool.begin().await?;

        // A missing quiz surfaces as 404 instead of an FK violation.
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (quiz_id, text, type)
            VALUES ($1, $2, $3)
            RETURNING id, quiz_id, text, type, created_at
            "#,
        )
        .bind(quiz_id)
        .bind(&req.text)
        .bind(req.question_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut answers = Vec::with_capacity(req.answers.len());
        for answer in &req.answers {
            let created = sqlx::query_as::<_, Answer>(
                r#"
                INSERT INTO answers (question_id, text, is_correct)
                VALUES ($1, $2, $3)
                RETURNING id, question_id, text, is_correct
                "#,
            )
            .bind(question.id)
            .bind(&answer.text)
            .bind(answer.is_correct)
            .fetch_one(&mut *tx)
            .await?;
            answers.push(created);
        }

        tx.commit().await?;

        Ok(QuestionWithAnswers { question, answers })
    }

    async fn upcoming_events(
        &self,
        now: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, location
            FROM events
            WHERE date >= $1
            ORDER BY date, id
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn past_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, location
            FROM events
            WHERE date < $1
            ORDER BY date, id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn create_event(&self, req: &CreateEventRequest) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, date, location)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, date, location
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .bind(&req.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(event)
    }

    async fn create_submission(
        &self,
        quiz_id: i64,
        user_name: &str,
    ) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO user_submissions (quiz_id, user_name, score)
            VALUES ($1, $2, 0)
            RETURNING id, quiz_id, user_name, score, submitted_at
            "#,
        )
        .bind(quiz_id)
        .bind(user_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create submission: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(submission)
    }

    async fn finalize_submission(
        &self,
        submission_id: i64,
        score: i32,
        records: &[GradedAnswer],
    ) -> Result<Vec<UserAnswer>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE user_submissions SET score = $1 WHERE id = $2")
            .bind(score)
            .bind(submission_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Submission not found".to_string()));
        }

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let user_answer = sqlx::query_as::<_, UserAnswer>(
                r#"
                INSERT INTO user_answers (submission_id, question_id, answer_id, is_correct)
                VALUES ($1, $2, $3, $4)
                RETURNING id, submission_id, question_id, answer_id, is_correct
                "#,
            )
            .bind(submission_id)
            .bind(record.question_id)
            .bind(record.answer_id)
            .bind(record.is_correct)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record user answer: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;
            saved.push(user_answer);
        }

        tx.commit().await?;

        Ok(saved)
    }

    async fn delete_submission(&self, id: i64) -> Result<(), AppError> {
        // user_answers rows go with it (ON DELETE CASCADE).
        sqlx::query("DELETE FROM user_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, quiz_id, user_name, score, submitted_at
            FROM user_submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn submission_answers(
        &self,
        submission_id: i64,
    ) -> Result<Vec<UserAnswerDetail>, AppError> {
        let answers = sqlx::query_as::<_, UserAnswerDetail>(
            r#"
            SELECT
                ua.id,
                ua.question_id,
                q.text AS question_text,
                q.type AS question_type,
                ua.answer_id,
                a.text AS answer_text,
                ua.is_correct
            FROM user_answers ua
            JOIN questions q ON q.id = ua.question_id
            JOIN answers a ON a.id = ua.answer_id
            WHERE ua.submission_id = $1
            ORDER BY ua.id
            "#,
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    async fn correct_answers(&self, question_ids: &[i64]) -> Result<Vec<Answer>, AppError> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, text, is_correct
            FROM answers
            WHERE question_id = ANY($1) AND is_correct
            ORDER BY id
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}
