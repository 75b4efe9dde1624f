// src/main.rs

use std::sync::Arc;

use quiz_events::config::Config;
use quiz_events::routes;
use quiz_events::state::AppState;
use quiz_events::store::{MemoryStore, PgStore, QuizStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store: Arc<dyn QuizStore> = match &config.database_url {
        Some(database_url) => Arc::new(PgStore::connect(&config, database_url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store);

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
