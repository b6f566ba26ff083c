//! Resources owned by a team outside the accounts store

use async_trait::async_trait;

use super::entity::TeamAlias;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Removes the services and API clients that belong to a team
///
/// Called while cascading a user deletion, before the team document itself is
/// removed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamResourceCleaner: Send + Sync {
    /// Deletes the team's services, returning how many were removed
    async fn delete_services(&self, alias: &TeamAlias) -> Result<usize, DomainError>;

    /// Deletes the team's API clients, returning how many were removed
    async fn delete_clients(&self, alias: &TeamAlias) -> Result<usize, DomainError>;
}
