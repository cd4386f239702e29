// API type definitions module
// Response bodies and boundary validation of request inputs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Number, Value};

use crate::domain::model::{date_from_millis, parse_date, render_date, Exercise, User};
use crate::domain::{AppError, LogQuery, LoggedExercise, NewExercise, UserLog};
use crate::http::Fields;

// ============== Responses ==============

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub id: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

/// `id` is the owning user's id, not the exercise's
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: String,
    pub username: String,
    pub date: String,
    pub duration: Number,
    pub description: String,
}

impl From<LoggedExercise> for ExerciseResponse {
    fn from(logged: LoggedExercise) -> Self {
        Self {
            id: logged.user.id,
            username: logged.user.username,
            date: render_date(&logged.exercise.date),
            duration: logged.exercise.duration,
            description: logged.exercise.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: Number,
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: render_date(&exercise.date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub id: String,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

impl From<UserLog> for LogResponse {
    fn from(log: UserLog) -> Self {
        Self {
            count: log.count(),
            id: log.user.id,
            username: log.user.username,
            log: log.entries.into_iter().map(LogEntry::from).collect(),
        }
    }
}

// ============== Requests ==============

/// Validated `POST /api/users` body
#[derive(Debug)]
pub struct CreateUserRequest {
    pub username: String,
}

impl CreateUserRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self, AppError> {
        Ok(Self {
            username: required_text(fields, "username")?,
        })
    }
}

/// Validate a `POST /api/users/:id/exercises` body
pub fn new_exercise(user_id: String, fields: &Fields) -> Result<NewExercise, AppError> {
    Ok(NewExercise {
        user_id,
        description: required_text(fields, "description")?,
        duration: required_number(fields, "duration")?,
        date: optional_date(fields, "date")?,
    })
}

/// Validate `GET /api/users/:id/logs` query parameters
pub fn log_query(fields: &Fields) -> Result<LogQuery, AppError> {
    Ok(LogQuery {
        from: optional_date(fields, "from")?,
        to: optional_date(fields, "to")?,
        limit: optional_limit(fields, "limit")?,
    })
}

/// Present and not blank; `null` and `""` count as missing
fn present<'a>(fields: &'a Fields, key: &str) -> Option<&'a Value> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    }
}

/// Scalars coerce to text; an empty string is treated as missing
fn required_text(fields: &Fields, key: &str) -> Result<String, AppError> {
    match present(fields, key) {
        None => Err(AppError::validation(format!("`{key}` is required"))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(AppError::validation(format!("`{key}` must be text"))),
    }
}

fn required_number(fields: &Fields, key: &str) -> Result<Number, AppError> {
    match present(fields, key) {
        None => Err(AppError::validation(format!("`{key}` is required"))),
        Some(Value::Number(n)) => Ok(n.clone()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<Number>()
            .map_err(|_| AppError::validation(format!("`{key}` must be a number"))),
        Some(_) => Err(AppError::validation(format!("`{key}` must be a number"))),
    }
}

/// Date strings per `parse_date`, or integer epoch milliseconds
fn optional_date(fields: &Fields, key: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    let invalid = || AppError::validation(format!("`{key}` is not a valid date"));
    match present(fields, key) {
        None => Ok(None),
        Some(Value::String(s)) => parse_date(s).map(Some).ok_or_else(invalid),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(date_from_millis)
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

fn optional_limit(fields: &Fields, key: &str) -> Result<Option<usize>, AppError> {
    let invalid = || AppError::validation(format!("`{key}` must be a non-negative integer"));
    match present(fields, key) {
        None => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<usize>().map(Some).map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}
