use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::{User, UserChanges};

/// Process-local user store for development and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert_user_if_absent(&self, user: &User) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_id) {
            return Ok(false);
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(true)
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(user_id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }
}
