//! Team domain module
//!
//! A team is a named group of users keyed by a unique alias. The creator owns
//! the team; members may rename it and manage membership, only the owner may
//! delete it.

mod access;
mod entity;
mod repository;
mod resources;
mod validation;

pub use access::{require_membership, require_ownership, NOT_A_MEMBER, NOT_THE_OWNER};
pub use entity::{Team, TeamAlias};
pub use repository::TeamRepository;
pub use resources::TeamResourceCleaner;
pub use validation::{
    alias_from_name, slugify, validate_team_alias, validate_team_name, TeamValidationError,
};

#[cfg(test)]
pub use resources::MockTeamResourceCleaner;
