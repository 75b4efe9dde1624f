// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        question::PublicQuestion,
        quiz::{Quiz, QuizSummary},
        submission::SubmitResponse,
    },
    services::submission::{complete_submission, start_submission},
    store::QuizStore,
    utils::form::AttemptForm,
};

/// Attempt page payload: the quiz and its questions without correctness flags.
#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub quiz: Quiz,
    pub questions: Vec<PublicQuestion>,
}

/// Lists all quizzes, newest first.
pub async fn list_quizzes(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes(None).await?;
    Ok(Json(quizzes))
}

/// Retrieves a single quiz with its question count.
pub async fn get_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .get_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;
    let question_count = store.count_questions(id).await?;

    Ok(Json(QuizSummary::new(quiz, question_count)))
}

/// Returns the questions and answer options needed to render the attempt form.
pub async fn get_attempt(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .get_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let questions = store
        .questions_with_answers(id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(AttemptResponse { quiz, questions }))
}

/// Submits an attempt.
///
/// * Body is an urlencoded form: `user_name` plus one repeatable
///   `question_<id>` field per question.
/// * Rejects a blank name before anything is stored.
/// * Grades, persists, and answers 201 with a `Location` pointing at the result.
pub async fn submit_attempt(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let form = AttemptForm::parse(&body);

    let submission = start_submission(store.as_ref(), id, &form.user_name).await?;
    let (score, records) = complete_submission(store.as_ref(), &submission, &form.selections).await?;

    let result_url = format!("/api/results/{}", submission.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, result_url.clone())],
        Json(SubmitResponse {
            submission_id: submission.id,
            score,
            answers_recorded: records.len(),
            result_url,
            message: "Quiz submitted successfully!".to_string(),
        }),
    ))
}
