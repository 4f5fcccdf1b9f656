pub mod memory;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use std::error::Error;
use std::fmt;

use crate::models::{User, UserChanges};

pub use memory::InMemoryUserStore;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug)]
pub enum StoreError {
    /// No backing store was configured for this process.
    NotConfigured,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotConfigured => write!(f, "User store is not configured (DATABASE_URL environment variable)"),
            StoreError::Backend(msg) => write!(f, "User store error: {}", msg),
        }
    }
}

impl Error for StoreError {}

/// Key-value persistence for `User` records, keyed by `userId`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Atomic conditional write. Returns `false` when a record with the same
    /// `userId` already exists; the stored record is left untouched.
    async fn insert_user_if_absent(&self, user: &User) -> Result<bool, StoreError>;

    /// Merges `changes` into an existing record and returns the new state,
    /// or `None` if there is no such record.
    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<Option<User>, StoreError>;
}

/// Stand-in used when no database is configured. Every call fails with `NotConfigured`.
pub struct UnconfiguredUserStore;

#[async_trait]
impl UserStore for UnconfiguredUserStore {
    async fn find_user(&self, _user_id: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn insert_user_if_absent(&self, _user: &User) -> Result<bool, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn update_user(&self, _user_id: &str, _changes: &UserChanges) -> Result<Option<User>, StoreError> {
        Err(StoreError::NotConfigured)
    }
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Database name comes from the URI path
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| "TaskManagerPro".to_string());

        let client = Client::with_options(client_options)?;

        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB, collection: &str) -> Self {
        Self {
            users: db.collection::<User>(collection),
        }
    }

    /// Store whose unique `userId` index is in place. Fails rather than
    /// serving without it.
    pub async fn open(db: &MongoDB, collection: &str) -> Result<Self, StoreError> {
        let store = Self::new(db, collection);
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Unique `userId` index; it is what makes `insert_user_if_absent` atomic.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        log::info!("🔧 Creating user store indexes...");

        let user_id_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.users
            .create_index(user_id_index)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        log::info!("   ✅ Index ready: users(userId, unique)");

        let email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();

        match self.users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index ready: users(email)"),
            Err(e) => log::debug!("   ℹ️  Email index not created: {}", e),
        }

        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "userId": user_id })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn insert_user_if_absent(&self, user: &User) -> Result<bool, StoreError> {
        match self.users.insert_one(user).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let mut set = Document::new();
        if let Some(name) = &changes.name {
            set.insert("name", name.as_str());
        }
        if let Some(account_type) = changes.account_type {
            set.insert("accountType", account_type.as_str());
        }
        set.insert("updatedAt", changes.updated_at.as_str());

        self.users
            .find_one_and_update(doc! { "userId": user_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn sample_user(user_id: &str) -> User {
        User {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            name: None,
            account_type: AccountType::Individual,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let store = UnconfiguredUserStore;
        assert!(matches!(store.find_user("a").await, Err(StoreError::NotConfigured)));
        assert!(matches!(
            store.insert_user_if_absent(&sample_user("a")).await,
            Err(StoreError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn open_fails_when_index_cannot_be_built() {
        let options = mongodb::options::ClientOptions::parse(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
        )
        .await
        .unwrap();
        let db = MongoDB {
            db: Client::with_options(options).unwrap().database("TaskManagerProTest"),
        };

        let result = MongoUserStore::open(&db, "users").await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_conditional_insert() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017/TaskManagerProTest".to_string());
        let db = MongoDB::new(&uri).await.unwrap();
        let store = MongoUserStore::open(&db, "users_test").await.unwrap();

        let user_id = format!("sub-{}", chrono::Utc::now().timestamp_millis());
        let user = sample_user(&user_id);
        assert!(store.insert_user_if_absent(&user).await.unwrap());
        assert!(!store.insert_user_if_absent(&user).await.unwrap());
        assert_eq!(store.find_user(&user_id).await.unwrap(), Some(user));
    }
}
