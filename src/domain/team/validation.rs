//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Name is a required field.")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Alias must contain at least one letter or number.")]
    EmptyAlias,

    #[error("Team alias cannot exceed {0} characters")]
    AliasTooLong(usize),
}

const MAX_TEAM_ALIAS_LENGTH: usize = 50;
const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Normalise free text into an alias: lower-case alphanumerics (any script)
/// joined by single hyphens, with no leading or trailing hyphen
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug of a team name cut to the alias length limit
pub fn alias_from_name(name: &str) -> String {
    let slug: String = slugify(name).chars().take(MAX_TEAM_ALIAS_LENGTH).collect();
    slug.trim_end_matches('-').to_string()
}

/// Validate an already-normalised alias
pub fn validate_team_alias(alias: &str) -> Result<(), TeamValidationError> {
    if alias.is_empty() {
        return Err(TeamValidationError::EmptyAlias);
    }

    if alias.chars().count() > MAX_TEAM_ALIAS_LENGTH {
        return Err(TeamValidationError::AliasTooLong(MAX_TEAM_ALIAS_LENGTH));
    }

    Ok(())
}

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}
