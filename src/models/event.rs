// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'events' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }
}

/// Events split around the current time.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub upcoming_events: Vec<Event>,
    pub past_events: Vec<Event>,
}

/// DTO for creating a new event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 20000))]
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}
