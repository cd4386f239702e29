// Application state module
// Wires the shared store into the services handed to every request

use std::sync::Arc;

use super::types::Config;
use crate::domain::{ExerciseService, LogService, UserService};
use crate::store::Store;

/// Application state
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub exercises: ExerciseService,
    pub logs: LogService,
}

impl AppState {
    /// Build the services around one store handle
    pub fn new(config: Config, store: Arc<Store>) -> Self {
        Self {
            config,
            users: UserService::new(Arc::clone(&store)),
            exercises: ExerciseService::new(Arc::clone(&store)),
            logs: LogService::new(store),
        }
    }
}
