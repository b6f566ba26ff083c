//! Team entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{
    alias_from_name, slugify, validate_team_alias, validate_team_name, TeamValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::Email;

/// Team alias - the unique lookup key of a team
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamAlias(String);

impl TeamAlias {
    /// Normalise and validate a caller-chosen alias
    pub fn new(alias: impl AsRef<str>) -> Result<Self, TeamValidationError> {
        let alias = slugify(alias.as_ref());
        validate_team_alias(&alias)?;
        Ok(Self(alias))
    }

    /// Derive an alias from a team name
    ///
    /// Long names are cut to the alias limit instead of being rejected.
    pub fn from_name(name: &str) -> Result<Self, TeamValidationError> {
        let alias = alias_from_name(name);
        validate_team_alias(&alias)?;
        Ok(Self(alias))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamAlias {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamAlias> for String {
    fn from(alias: TeamAlias) -> Self {
        alias.0
    }
}

impl std::fmt::Display for TeamAlias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TeamAlias {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team entity
///
/// Serialized field order is the wire order: name, alias, users, owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    name: String,
    alias: TeamAlias,
    users: Vec<Email>,
    owner: Email,
}

impl Team {
    /// Create a team owned by `owner`, who is also its only member
    pub fn new(
        name: impl Into<String>,
        alias: TeamAlias,
        owner: Email,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;

        Ok(Self {
            name,
            alias,
            users: vec![owner.clone()],
            owner,
        })
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &TeamAlias {
        &self.alias
    }

    pub fn users(&self) -> &[Email] {
        &self.users
    }

    pub fn owner(&self) -> &Email {
        &self.owner
    }

    pub fn is_member(&self, email: &Email) -> bool {
        self.users.contains(email)
    }

    pub fn is_owner(&self, email: &Email) -> bool {
        &self.owner == email
    }

    /// True when `email` owns the team and nobody else belongs to it
    pub fn is_sole_member(&self, email: &Email) -> bool {
        self.is_owner(email) && self.users.len() == 1 && self.users[0] == *email
    }

    // Mutators

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Append members not already present, keeping input order
    ///
    /// Returns how many were added.
    pub fn add_users(&mut self, emails: impl IntoIterator<Item = Email>) -> usize {
        let before = self.users.len();

        for email in emails {
            if !self.users.contains(&email) {
                self.users.push(email);
            }
        }

        self.users.len() - before
    }

    /// Remove every listed member, the owner included
    ///
    /// Returns how many were removed.
    pub fn remove_users(&mut self, emails: &[Email]) -> usize {
        let before = self.users.len();
        self.users.retain(|u| !emails.contains(u));
        before - self.users.len()
    }
}

impl StorageEntity for Team {
    type Key = TeamAlias;

    fn key(&self) -> &Self::Key {
        &self.alias
    }
}
