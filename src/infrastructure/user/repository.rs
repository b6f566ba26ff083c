//! Storage-backed user repository

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::user::{Email, User, UserRepository};
use crate::domain::DomainError;

/// Unique document fields of the users collection besides the email key
pub const USER_UNIQUE_FIELDS: &[&str] = &["username"];

/// Implementation of UserRepository over a document collection
#[derive(Debug)]
pub struct StorageUserRepository {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserRepository {
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserRepository for StorageUserRepository {
    async fn get(&self, email: &Email) -> Result<Option<User>, DomainError> {
        self.storage.get(email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let filter = DocumentFilter::new().equals("username", username);
        Ok(self.storage.find(&filter).await?.into_iter().next())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.storage.create(user).await
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        self.storage.update(user).await
    }

    async fn delete(&self, email: &Email) -> Result<bool, DomainError> {
        self.storage.delete(email).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn exists(&self, email: &Email) -> Result<bool, DomainError> {
        self.storage.exists(email).await
    }
}
