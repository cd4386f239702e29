use chrono::{DateTime, Utc};
use serde_json::Number;
use std::sync::Arc;

use super::error::AppError;
use super::model::{Exercise, User};
use crate::logger;
use crate::store::Store;

/// Validated input for a new exercise
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub user_id: String,
    pub description: String,
    pub duration: Number,
    /// Defaults to the time of creation
    pub date: Option<DateTime<Utc>>,
}

/// A stored exercise together with its owner
#[derive(Debug, Clone)]
pub struct LoggedExercise {
    pub user: User,
    pub exercise: Exercise,
}

/// Records exercises against users
#[derive(Clone)]
pub struct ExerciseService {
    store: Arc<Store>,
}

impl ExerciseService {
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Persist an exercise, then resolve its owner's username.
    ///
    /// The exercise is written before the owner is looked up, so an unknown
    /// `user_id` still leaves the record behind and only then reports
    /// `NotFound`.
    pub async fn create_exercise(&self, input: NewExercise) -> Result<LoggedExercise, AppError> {
        let exercise = Exercise::new(input.user_id, input.description, input.duration, input.date);
        self.store.insert_exercise(exercise.clone()).await?;

        let Some(user) = self.store.find_user(&exercise.user_id).await else {
            logger::log_warning(&format!(
                "Exercise {} stored for unknown user {}",
                exercise.id, exercise.user_id
            ));
            return Err(AppError::not_found(format!(
                "Unknown userId: {}",
                exercise.user_id
            )));
        };

        Ok(LoggedExercise { user, exercise })
    }
}
