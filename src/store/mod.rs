// Document store module
// Holds user and exercise documents in memory, optionally mirrored to a JSON file

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::domain::model::{Exercise, User};
use crate::logger;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize documents: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Snapshot of every collection, serialized as one JSON document
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Documents {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    exercises: Vec<Exercise>,
}

/// Process-wide document store handle
///
/// Collections keep insertion order. Every insert holds the write lock while
/// the snapshot file is written, so the file always reflects a committed
/// prefix of the inserts; a failed write undoes the insert.
pub struct Store {
    /// Snapshot file; `None` keeps everything in memory
    path: Option<PathBuf>,
    documents: RwLock<Documents>,
}

impl Store {
    /// Create an empty store with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            documents: RwLock::new(Documents::default()),
        }
    }

    /// Open a file-backed store, loading the snapshot if one exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let documents = Self::load(&path).await?;
        Ok(Self {
            path: Some(path),
            documents: RwLock::new(documents),
        })
    }

    /// Build the store described by the configuration
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.path.as_deref() {
            Some(path) if !path.trim().is_empty() => Self::open(path).await,
            _ => Ok(Self::in_memory()),
        }
    }

    async fn load(path: &Path) -> Result<Documents, StoreError> {
        let content = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                logger::log_info(&format!(
                    "No store file at {}, starting empty",
                    path.display()
                ));
                return Ok(Documents::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let documents: Documents =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        logger::log_info(&format!(
            "Loaded {} users and {} exercises from {}",
            documents.users.len(),
            documents.exercises.len(),
            path.display()
        ));
        Ok(documents)
    }

    /// Write the snapshot via a temp file and rename
    async fn save(&self, documents: &Documents) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_json::to_vec_pretty(documents).map_err(StoreError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, content).await.map_err(write_err)?;
        fs::rename(&tmp_path, path).await.map_err(write_err)
    }

    pub async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.users.push(user);
        if let Err(e) = self.save(&documents).await {
            documents.users.pop();
            return Err(e);
        }
        Ok(())
    }

    pub async fn insert_exercise(&self, exercise: Exercise) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.exercises.push(exercise);
        if let Err(e) = self.save(&documents).await {
            documents.exercises.pop();
            return Err(e);
        }
        Ok(())
    }

    /// All users in insertion order
    pub async fn users(&self) -> Vec<User> {
        self.documents.read().await.users.clone()
    }

    pub async fn find_user(&self, id: &str) -> Option<User> {
        self.documents
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Exercises whose `user_id` equals `user_id` exactly, in insertion order
    pub async fn exercises_for_user(&self, user_id: &str) -> Vec<Exercise> {
        self.documents
            .read()
            .await
            .exercises
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}
