//! Storage-backed team repository

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::team::{Team, TeamAlias, TeamRepository};
use crate::domain::user::Email;
use crate::domain::DomainError;

/// Implementation of TeamRepository over a document collection
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TeamRepository for StorageTeamRepository {
    async fn get(&self, alias: &TeamAlias) -> Result<Option<Team>, DomainError> {
        self.storage.get(alias).await
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        self.storage.create(team).await
    }

    async fn update(&self, team: Team) -> Result<Team, DomainError> {
        self.storage.update(team).await
    }

    async fn delete(&self, alias: &TeamAlias) -> Result<bool, DomainError> {
        self.storage.delete(alias).await
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.storage.list().await
    }

    async fn list_by_member(&self, email: &Email) -> Result<Vec<Team>, DomainError> {
        let filter = DocumentFilter::new().contains("users", email.as_str());
        self.storage.find(&filter).await
    }

    async fn list_solely_owned_by(&self, email: &Email) -> Result<Vec<Team>, DomainError> {
        let filter = DocumentFilter::new()
            .equals("owner", email.as_str())
            .array_len("users", 1);

        // The single remaining user must be the owner, not whoever was left behind
        Ok(self
            .storage
            .find(&filter)
            .await?
            .into_iter()
            .filter(|team| team.is_sole_member(email))
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn exists(&self, alias: &TeamAlias) -> Result<bool, DomainError> {
        self.storage.exists(alias).await
    }
}
