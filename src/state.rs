use std::sync::Arc;

use axum::extract::FromRef;

use crate::store::QuizStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuizStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }
}

impl FromRef<AppState> for Arc<dyn QuizStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
