//! Default cleaner for team-owned services and API clients

use async_trait::async_trait;
use tracing::debug;

use crate::domain::team::{TeamAlias, TeamResourceCleaner};
use crate::domain::DomainError;

/// Cleaner used when no service catalogue is attached
///
/// Services and API clients live outside the accounts store, so there is
/// nothing to remove here.
#[derive(Debug, Clone, Default)]
pub struct DetachedResourceCleaner;

impl DetachedResourceCleaner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TeamResourceCleaner for DetachedResourceCleaner {
    async fn delete_services(&self, alias: &TeamAlias) -> Result<usize, DomainError> {
        debug!(team = %alias, "No service catalogue attached, skipping services");
        Ok(0)
    }

    async fn delete_clients(&self, alias: &TeamAlias) -> Result<usize, DomainError> {
        debug!(team = %alias, "No service catalogue attached, skipping clients");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detached_cleaner_removes_nothing() {
        let cleaner = DetachedResourceCleaner::new();
        let alias = TeamAlias::new("apihub").unwrap();

        assert_eq!(cleaner.delete_services(&alias).await.unwrap(), 0);
        assert_eq!(cleaner.delete_clients(&alias).await.unwrap(), 0);
    }
}
