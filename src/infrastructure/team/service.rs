//! Team service for team management

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::team::{
    require_membership, require_ownership, validate_team_name, Team, TeamAlias, TeamRepository,
    TeamValidationError,
};
use crate::domain::user::Email;
use crate::domain::DomainError;

pub const TEAM_NOT_FOUND: &str = "Team not found.";
pub const DUPLICATE_ALIAS: &str = "Someone already has that team alias. Could you try another?";

/// Request for creating a new team
#[derive(Debug, Clone, Default)]
pub struct CreateTeamRequest {
    pub name: String,
    /// Derived from the name when absent or blank
    pub alias: Option<String>,
}

/// Team operations exposed to the HTTP layer
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync + std::fmt::Debug {
    async fn create_team(&self, request: CreateTeamRequest, creator: &Email) -> Result<Team, DomainError>;
    async fn team_info(&self, alias: &str, requester: &Email) -> Result<Team, DomainError>;
    async fn list_teams(&self) -> Result<Vec<Team>, DomainError>;
    async fn update_team(&self, alias: &str, name: &str, requester: &Email) -> Result<Team, DomainError>;
    async fn delete_team(&self, alias: &str, requester: &Email) -> Result<Team, DomainError>;
    async fn add_members(&self, alias: &str, emails: &[String], requester: &Email) -> Result<Team, DomainError>;
    async fn remove_members(&self, alias: &str, emails: &[String], requester: &Email) -> Result<Team, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

fn team_error(error: TeamValidationError) -> DomainError {
    match error {
        TeamValidationError::EmptyName => DomainError::missing_required_field(error.to_string()),
        _ => DomainError::validation(error.to_string()),
    }
}

/// Team service
#[derive(Debug)]
pub struct TeamService<R: TeamRepository> {
    repository: Arc<R>,
}

impl<R: TeamRepository> TeamService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a team owned by `creator`, who becomes its only member
    pub async fn create(&self, request: CreateTeamRequest, creator: &Email) -> Result<Team, DomainError> {
        let name = request.name.trim();
        // A blank name fails as a missing name, not as an empty derived alias
        validate_team_name(name).map_err(team_error)?;

        let alias = match request.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => TeamAlias::new(alias),
            _ => TeamAlias::from_name(name),
        }
        .map_err(team_error)?;

        let team = Team::new(name, alias, creator.clone()).map_err(team_error)?;

        if self.repository.exists(team.alias()).await? {
            return Err(DomainError::duplicate(DUPLICATE_ALIAS));
        }

        info!(alias = %team.alias(), owner = %creator, "Creating team");

        self.repository.create(team).await.map_err(|e| match e {
            DomainError::Duplicate { .. } => DomainError::duplicate(DUPLICATE_ALIAS),
            other => other,
        })
    }

    pub async fn get(&self, alias: &str) -> Result<Team, DomainError> {
        debug!(alias = %alias, "Looking up team");

        // Path segments are matched verbatim; only normalised aliases exist
        let key = match TeamAlias::new(alias) {
            Ok(key) if key.as_str() == alias => key,
            _ => return Err(DomainError::not_found(TEAM_NOT_FOUND)),
        };

        self.repository
            .get(&key)
            .await?
            .ok_or_else(|| DomainError::not_found(TEAM_NOT_FOUND))
    }

    /// Fetch a team the requester belongs to
    pub async fn get_as_member(&self, alias: &str, requester: &Email) -> Result<Team, DomainError> {
        let team = self.get(alias).await?;
        Self::checked(require_membership(&team, requester), &team, requester)?;
        Ok(team)
    }

    /// All teams, whoever asks
    pub async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.repository.list().await
    }

    /// Rename a team; any member may do so
    pub async fn update(&self, alias: &str, name: &str, requester: &Email) -> Result<Team, DomainError> {
        let mut team = self.get_as_member(alias, requester).await?;

        team.rename(name.trim()).map_err(team_error)?;

        info!(alias = %alias, requester = %requester, "Renaming team");
        self.repository.update(team).await
    }

    /// Delete a team; only the owner may do so
    pub async fn delete(&self, alias: &str, requester: &Email) -> Result<Team, DomainError> {
        let team = self.get(alias).await?;
        Self::checked(require_ownership(&team, requester), &team, requester)?;

        info!(alias = %alias, requester = %requester, "Deleting team");
        self.repository.delete(team.alias()).await?;
        Ok(team)
    }

    /// Append members in input order, skipping blanks and existing members
    pub async fn add_members(
        &self,
        alias: &str,
        emails: &[String],
        requester: &Email,
    ) -> Result<Team, DomainError> {
        let mut team = self.get_as_member(alias, requester).await?;

        let emails = emails
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(|e| Email::new(e).map_err(|err| DomainError::validation(err.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let added = team.add_users(emails);
        info!(alias = %alias, requester = %requester, added, "Adding team members");

        self.repository.update(team).await
    }

    /// Remove members; the owner is not protected
    pub async fn remove_members(
        &self,
        alias: &str,
        emails: &[String],
        requester: &Email,
    ) -> Result<Team, DomainError> {
        let mut team = self.get_as_member(alias, requester).await?;

        // Strings that are not emails cannot be members
        let emails: Vec<Email> = emails.iter().filter_map(|e| Email::new(e.as_str()).ok()).collect();

        let removed = team.remove_users(&emails);
        if emails.contains(team.owner()) {
            warn!(alias = %alias, owner = %team.owner(), "Owner removed from team members");
        }
        info!(alias = %alias, requester = %requester, removed, "Removing team members");

        self.repository.update(team).await
    }

    fn checked(result: Result<(), DomainError>, team: &Team, requester: &Email) -> Result<(), DomainError> {
        if let Err(e) = &result {
            warn!(alias = %team.alias(), requester = %requester, reason = %e, "Team access refused");
        }
        result
    }
}

#[async_trait::async_trait]
impl<R: TeamRepository + 'static> TeamServiceTrait for TeamService<R> {
    async fn create_team(&self, request: CreateTeamRequest, creator: &Email) -> Result<Team, DomainError> {
        self.create(request, creator).await
    }

    async fn team_info(&self, alias: &str, requester: &Email) -> Result<Team, DomainError> {
        self.get_as_member(alias, requester).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DomainError> {
        self.list().await
    }

    async fn update_team(&self, alias: &str, name: &str, requester: &Email) -> Result<Team, DomainError> {
        self.update(alias, name, requester).await
    }

    async fn delete_team(&self, alias: &str, requester: &Email) -> Result<Team, DomainError> {
        self.delete(alias, requester).await
    }

    async fn add_members(&self, alias: &str, emails: &[String], requester: &Email) -> Result<Team, DomainError> {
        TeamService::add_members(self, alias, emails, requester).await
    }

    async fn remove_members(&self, alias: &str, emails: &[String], requester: &Email) -> Result<Team, DomainError> {
        TeamService::remove_members(self, alias, emails, requester).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
