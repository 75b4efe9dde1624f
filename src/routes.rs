// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, event, home, quiz, result},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quizzes, results, events, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (the store).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        .route(
            "/{id}/attempt",
            get(quiz::get_attempt).post(quiz::submit_attempt),
        );

    let result_routes = Router::new().route("/{id}", get(result::get_result));

    let event_routes = Router::new().route("/", get(event::list_events));

    // Catalog creation only; editing screens and auth live outside this service.
    let admin_routes = Router::new()
        .route("/quizzes", post(admin::create_quiz))
        .route("/quizzes/{id}/questions", post(admin::create_question))
        .route("/events", post(admin::create_event));

    Router::new()
        .route("/api/home", get(home::home))
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/results", result_routes)
        .nest("/api/events", event_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
