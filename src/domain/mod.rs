//! Domain module
//!
//! Record types, the error taxonomy, and the three services the HTTP layer
//! calls into. Every service holds an explicit handle to the shared store.

pub mod error;
pub mod exercises;
pub mod logs;
pub mod model;
pub mod users;

pub use error::AppError;
pub use exercises::{ExerciseService, LoggedExercise, NewExercise};
pub use logs::{LogQuery, LogService, UserLog};
pub use users::UserService;
