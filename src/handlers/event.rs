// src/handlers/event.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use crate::{error::AppError, models::event::EventListResponse, store::QuizStore};

/// Lists upcoming and past events, each in date order.
pub async fn list_events(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let upcoming_events = store.upcoming_events(now, None).await?;
    let past_events = store.past_events(now).await?;

    Ok(Json(EventListResponse {
        upcoming_events,
        past_events,
    }))
}
