//! Unit of work removing the teams that disappear with their last user

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::team::{TeamAlias, TeamRepository, TeamResourceCleaner};
use crate::domain::user::Email;
use crate::domain::DomainError;

/// Result of running a cascade
#[derive(Debug, Default, PartialEq)]
pub struct CascadeOutcome {
    /// Teams fully removed along with their services and clients
    pub removed: Vec<TeamAlias>,
    /// One entry per team whose removal stopped part way
    pub failures: Vec<String>,
}

impl CascadeOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Cascade` error when any team could not be removed
    pub fn into_result(self) -> Result<Vec<TeamAlias>, DomainError> {
        if self.failures.is_empty() {
            Ok(self.removed)
        } else {
            Err(DomainError::cascade(self.failures))
        }
    }
}

/// Planned removal of every team solely owned and occupied by one user
///
/// For each team the services go first, then the API clients, then the team
/// document. A failed step leaves that team in place and moves on to the next.
pub struct TeamCascade {
    teams: Arc<dyn TeamRepository>,
    cleaner: Arc<dyn TeamResourceCleaner>,
    owner: Email,
    planned: Vec<TeamAlias>,
}

impl std::fmt::Debug for TeamCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamCascade")
            .field("owner", &self.owner)
            .field("planned", &self.planned)
            .finish()
    }
}

impl TeamCascade {
    /// Look up the teams that would be left empty without `owner`
    pub async fn plan(
        teams: Arc<dyn TeamRepository>,
        cleaner: Arc<dyn TeamResourceCleaner>,
        owner: &Email,
    ) -> Result<Self, DomainError> {
        let planned = teams
            .list_solely_owned_by(owner)
            .await?
            .into_iter()
            .map(|team| team.alias().clone())
            .collect();

        Ok(Self {
            teams,
            cleaner,
            owner: owner.clone(),
            planned,
        })
    }

    pub fn planned(&self) -> &[TeamAlias] {
        &self.planned
    }

    pub async fn execute(self) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();

        for alias in &self.planned {
            match self.remove_team(alias).await {
                Ok(()) => {
                    info!(team = %alias, owner = %self.owner, "Removed team with its last user");
                    outcome.removed.push(alias.clone());
                }
                Err(e) => {
                    warn!(team = %alias, owner = %self.owner, error = %e, "Team cascade step failed");
                    outcome.failures.push(format!("team '{}': {}", alias, e));
                }
            }
        }

        outcome
    }

    async fn remove_team(&self, alias: &TeamAlias) -> Result<(), DomainError> {
        self.cleaner.delete_services(alias).await?;
        self.cleaner.delete_clients(alias).await?;
        self.teams.delete(alias).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::{MockTeamResourceCleaner, Team};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::team::StorageTeamRepository;
    use mockall::predicate::eq;

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    fn alias(s: &str) -> TeamAlias {
        TeamAlias::new(s).unwrap()
    }

    async fn seeded_teams() -> Arc<dyn TeamRepository> {
        let repo = StorageTeamRepository::new(Arc::new(InMemoryStorage::<Team>::new()));

        for name in ["first", "second"] {
            repo.create(Team::new(name, alias(name), email("bob@bar.example.org")).unwrap())
                .await
                .unwrap();
        }

        let mut shared = Team::new("shared", alias("shared"), email("bob@bar.example.org")).unwrap();
        shared.add_users(vec![email("alice@bar.example.org")]);
        repo.create(shared).await.unwrap();

        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_plan_only_includes_sole_member_teams() {
        let teams = seeded_teams().await;
        let cleaner = Arc::new(MockTeamResourceCleaner::new());

        let cascade = TeamCascade::plan(teams, cleaner, &email("bob@bar.example.org"))
            .await
            .unwrap();

        assert_eq!(cascade.planned(), &[alias("first"), alias("second")]);
    }

    #[tokio::test]
    async fn test_execute_removes_resources_then_team() {
        let teams = seeded_teams().await;
        let mut cleaner = MockTeamResourceCleaner::new();
        cleaner.expect_delete_services().times(2).returning(|_| Ok(1));
        cleaner.expect_delete_clients().times(2).returning(|_| Ok(0));

        let cascade = TeamCascade::plan(teams.clone(), Arc::new(cleaner), &email("bob@bar.example.org"))
            .await
            .unwrap();
        let outcome = cascade.execute().await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.removed, vec![alias("first"), alias("second")]);
        assert!(teams.get(&alias("first")).await.unwrap().is_none());
        assert!(teams.get(&alias("shared")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_step_keeps_team_and_continues() {
        let teams = seeded_teams().await;
        let mut cleaner = MockTeamResourceCleaner::new();
        cleaner
            .expect_delete_services()
            .with(eq(alias("first")))
            .returning(|_| Err(DomainError::storage("services unavailable")));
        cleaner
            .expect_delete_services()
            .with(eq(alias("second")))
            .returning(|_| Ok(2));
        cleaner
            .expect_delete_clients()
            .with(eq(alias("second")))
            .times(1)
            .returning(|_| Ok(1));

        let cascade = TeamCascade::plan(teams.clone(), Arc::new(cleaner), &email("bob@bar.example.org"))
            .await
            .unwrap();
        let outcome = cascade.execute().await;

        assert_eq!(outcome.removed, vec![alias("second")]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("team 'first'"));
        assert!(teams.get(&alias("first")).await.unwrap().is_some());
        assert!(teams.get(&alias("second")).await.unwrap().is_none());

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, DomainError::Cascade { ref failures } if failures.len() == 1));
    }
}
