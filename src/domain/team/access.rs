//! Membership and ownership checks guarding team mutations

use super::entity::Team;
use crate::domain::user::Email;
use crate::domain::DomainError;

pub const NOT_A_MEMBER: &str = "You do not belong to this team!";
pub const NOT_THE_OWNER: &str = "Only the owner has permission to perform this operation.";

/// Fails with `Forbidden` unless `email` is listed among the team's users
pub fn require_membership(team: &Team, email: &Email) -> Result<(), DomainError> {
    if team.is_member(email) {
        Ok(())
    } else {
        Err(DomainError::forbidden(NOT_A_MEMBER))
    }
}

/// Fails with `Forbidden` unless `email` is the team owner
pub fn require_ownership(team: &Team, email: &Email) -> Result<(), DomainError> {
    if team.is_owner(email) {
        Ok(())
    } else {
        Err(DomainError::forbidden(NOT_THE_OWNER))
    }
}
