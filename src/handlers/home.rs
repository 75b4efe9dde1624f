// src/handlers/home.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::{
    config::HOME_PREVIEW_LIMIT,
    error::AppError,
    models::{event::Event, quiz::QuizSummary},
    store::QuizStore,
};

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub quizzes: Vec<QuizSummary>,
    pub events: Vec<Event>,
}

/// Latest quizzes and the next upcoming events.
pub async fn home(State(store): State<Arc<dyn QuizStore>>) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes(Some(HOME_PREVIEW_LIMIT)).await?;
    let events = store
        .upcoming_events(Utc::now(), Some(HOME_PREVIEW_LIMIT))
        .await?;

    Ok(Json(HomeResponse { quizzes, events }))
}
