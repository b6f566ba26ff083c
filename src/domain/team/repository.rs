//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamAlias};
use crate::domain::user::Email;
use crate::domain::DomainError;

/// Repository for managing teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by alias
    async fn get(&self, alias: &TeamAlias) -> Result<Option<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update an existing team
    async fn update(&self, team: Team) -> Result<Team, DomainError>;

    /// Delete a team by alias
    async fn delete(&self, alias: &TeamAlias) -> Result<bool, DomainError>;

    /// List all teams
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// Teams whose users include `email`
    async fn list_by_member(&self, email: &Email) -> Result<Vec<Team>, DomainError>;

    /// Teams owned by `email` where the owner is the only user
    async fn list_solely_owned_by(&self, email: &Email) -> Result<Vec<Team>, DomainError>;

    /// Count all teams
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an alias is taken
    async fn exists(&self, alias: &TeamAlias) -> Result<bool, DomainError>;
}
