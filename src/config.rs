// src/config.rs

use std::env;
use std::net::SocketAddr;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Number of quizzes and upcoming events shown on the home page.
pub const HOME_PREVIEW_LIMIT: i64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let bind_addr = parse_bind_addr(env::var("BIND_ADDR").ok().as_deref());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            db_max_connections,
            bind_addr,
            rust_log,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: parse_bind_addr(None),
            rust_log: "info".to_string(),
        }
    }
}

fn parse_bind_addr(raw: Option<&str>) -> SocketAddr {
    raw.and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)))
}
