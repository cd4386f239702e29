use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::error::AppError;
use super::model::{Exercise, User};
use crate::store::Store;

/// Optional date window and size cap for a log query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Inclusive lower bound
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub to: Option<DateTime<Utc>>,
    /// Keep at most this many entries, earliest inserted first
    pub limit: Option<usize>,
}

impl LogQuery {
    pub fn includes(&self, date: &DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| *date >= from) && self.to.map_or(true, |to| *date <= to)
    }

    /// Filter by date window, then truncate to `limit`, preserving order
    pub fn apply(&self, exercises: Vec<Exercise>) -> Vec<Exercise> {
        exercises
            .into_iter()
            .filter(|e| self.includes(&e.date))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// A user's filtered exercise log
#[derive(Debug, Clone)]
pub struct UserLog {
    pub user: User,
    pub entries: Vec<Exercise>,
}

impl UserLog {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// Answers exercise log queries
#[derive(Clone)]
pub struct LogService {
    store: Arc<Store>,
}

impl LogService {
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn get_logs(&self, user_id: &str, query: LogQuery) -> Result<UserLog, AppError> {
        let user = self
            .store
            .find_user(user_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Unknown userId: {user_id}")))?;

        let entries = query.apply(self.store.exercises_for_user(user_id).await);
        Ok(UserLog { user, entries })
    }
}
