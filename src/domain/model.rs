//! Record types and the date conventions shared by every endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

/// Stored user document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

impl User {
    pub fn new(username: String) -> Self {
        Self {
            id: new_id(),
            username,
        }
    }
}

/// Stored exercise document
///
/// `user_id` is a loose reference: nothing checks that a user with that id
/// exists when the exercise is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub description: String,
    /// Minutes, kept as submitted so integers render without a fraction
    pub duration: Number,
    pub date: DateTime<Utc>,
}

impl Exercise {
    pub fn new(
        user_id: String,
        description: String,
        duration: Number,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: new_id(),
            user_id,
            description,
            duration,
            date: date.unwrap_or_else(Utc::now),
        }
    }
}

/// Generate a document id: 32 lowercase hex digits
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Render a date as `Sun Jan 15 2023`; time of day is dropped
pub fn render_date(date: &DateTime<Utc>) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Parse a submitted date
///
/// Accepts `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC)
/// and RFC 3339 with an explicit offset.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Interpret a number as milliseconds since the Unix epoch
pub fn date_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
