//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Backing maps, kept behind one lock so lookups and creates can never
/// interleave on partially updated state
#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, User>,
    /// Index for email -> user ID lookup; doubles as the uniqueness guard
    email_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Create a repository with initial users
    ///
    /// A user whose email is already seeded is skipped entirely, keeping the
    /// email index and the id map consistent with each other.
    pub fn with_users(users: Vec<User>) -> Self {
        let mut store = Store::default();

        for user in users {
            if store.email_index.contains_key(user.email()) {
                continue;
            }

            store.email_index.insert(user.email().to_string(), *user.id());
            store.users.insert(*user.id(), user);
        }

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .email_index
            .get(email)
            .and_then(|user_id| store.users.get(user_id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        if store.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                user.email()
            )));
        }

        store
            .email_index
            .insert(user.email().to_string(), *user.id());
        store.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let store = self.store.read().await;
        Ok(store.email_index.contains_key(email))
    }
}
