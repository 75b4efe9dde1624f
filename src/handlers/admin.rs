// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        event::CreateEventRequest, question::CreateQuestionRequest, quiz::CreateQuizRequest,
    },
    store::QuizStore,
    utils::html::clean_html,
};

/// Creates a new quiz.
pub async fn create_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Json(mut payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.description = clean_html(&payload.description);

    let quiz = store.create_quiz(&payload).await?;
    tracing::info!(quiz_id = quiz.id, "Quiz created");

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Adds a question with its answer options to an existing quiz.
pub async fn create_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = store.create_question(quiz_id, &payload).await?;
    tracing::info!(
        quiz_id,
        question_id = created.question.id,
        answers = created.answers.len(),
        "Question created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Creates a new event.
pub async fn create_event(
    State(store): State<Arc<dyn QuizStore>>,
    Json(mut payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.description = clean_html(&payload.description);

    let event = store.create_event(&payload).await?;
    tracing::info!(event_id = event.id, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}
