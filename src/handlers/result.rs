// src/handlers/result.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, services::submission::view_result, store::QuizStore};

/// Shows a graded submission grouped by question.
pub async fn get_result(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = view_result(store.as_ref(), id).await?;
    Ok(Json(view))
}
