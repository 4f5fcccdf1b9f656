use chrono::{SecondsFormat, Utc};

use crate::{
    database::{StoreError, UserStore},
    models::{CreateUserInput, UpdateUserInput, User, UserChanges},
    utils::AppError,
};

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Looks up a user by `userId` (the identity provider's `sub`).
///
/// A store that is not configured reads as "no such user" so pages keep
/// rendering from the session alone; any other failure is an error.
pub async fn get_user(store: &dyn UserStore, user_id: &str) -> Result<Option<User>, AppError> {
    match store.find_user(user_id).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotConfigured) => {
            log::warn!("⚠️  User store not configured, treating {} as not found", user_id);
            Ok(None)
        }
        Err(e) => {
            log::error!("❌ Error getting user {}: {}", user_id, e);
            Err(AppError::OperationFailed("Failed to get user".to_string()))
        }
    }
}

/// Creates the user record unless one already exists.
///
/// Concurrent first writes are settled by the store's conditional insert; the
/// losing caller still gets back the value it attempted to write.
pub async fn create_user(store: &dyn UserStore, input: CreateUserInput) -> Result<User, AppError> {
    let now = now_iso();
    let user = User {
        user_id: input.user_id,
        email: input.email,
        name: input.name,
        account_type: input.account_type.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };

    match store.insert_user_if_absent(&user).await {
        Ok(true) => {
            log::info!("✅ User created: {}", user.user_id);
            Ok(user)
        }
        Ok(false) => {
            log::debug!("User {} already exists, keeping stored record", user.user_id);
            Ok(user)
        }
        Err(e) => {
            log::error!("❌ Error creating user {}: {}", user.user_id, e);
            Err(AppError::OperationFailed("Failed to create user".to_string()))
        }
    }
}

/// Partial merge of profile fields. `updatedAt` is refreshed on every call,
/// including calls that carry no field changes.
pub async fn update_user(store: &dyn UserStore, user_id: &str, input: UpdateUserInput) -> Result<User, AppError> {
    let changes = UserChanges {
        name: input.name,
        account_type: input.account_type,
        updated_at: now_iso(),
    };

    match store.update_user(user_id, &changes).await {
        Ok(Some(user)) => {
            log::info!("✅ User updated: {}", user_id);
            Ok(user)
        }
        Ok(None) => Err(AppError::NotFound(format!("User {}", user_id))),
        Err(e) => {
            log::error!("❌ Error updating user {}: {}", user_id, e);
            Err(AppError::OperationFailed("Failed to update user".to_string()))
        }
    }
}

pub async fn get_or_create_user(store: &dyn UserStore, input: CreateUserInput) -> Result<User, AppError> {
    if let Some(existing) = get_user(store, &input.user_id).await? {
        return Ok(existing);
    }
    create_user(store, input).await
}
