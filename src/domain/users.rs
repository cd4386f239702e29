use std::sync::Arc;

use super::error::AppError;
use super::model::User;
use crate::logger;
use crate::store::Store;

/// Creates and lists users
#[derive(Clone)]
pub struct UserService {
    store: Arc<Store>,
}

impl UserService {
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Persist a new user. Usernames are not required to be unique.
    pub async fn create_user(&self, username: String) -> Result<User, AppError> {
        let user = User::new(username);
        self.store.insert_user(user.clone()).await?;
        logger::log_debug(&format!("Created user {} ({})", user.id, user.username));
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.store.users().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn service() -> UserService {
        UserService::new(Arc::new(Store::in_memory()))
    }

    #[tokio::test]
    async fn test_create_user_echoes_username_with_fresh_id() {
        let users = service();
        let mut ids = HashSet::new();
        for _ in 0..5 {
            let user = users.create_user("fcc_test".to_string()).await.unwrap();
            assert_eq!(user.username, "fcc_test");
            assert!(!user.id.is_empty());
            assert!(ids.insert(user.id));
        }
    }

    #[tokio::test]
    async fn test_list_users_returns_everything_created() {
        let users = service();
        assert!(users.list_users().await.unwrap().is_empty());

        let a = users.create_user("a".to_string()).await.unwrap();
        let b = users.create_user("b".to_string()).await.unwrap();
        assert_eq!(users.list_users().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_persistence_error() {
        let path = crate::store::tests::temp_path("users.json");
        let blocker = path.with_extension("tmp");
        std::fs::create_dir_all(&blocker).unwrap();
        let users = UserService::new(Arc::new(Store::open(&path).await.unwrap()));

        let result = users.create_user("carol".to_string()).await;
        let _ = std::fs::remove_dir_all(&blocker);
        assert!(matches!(result, Err(AppError::Persistence(_))));
    }
}
