//! User domain
//!
//! Users are identified by email. Credentials are stored as salted hashes only.

mod entity;
mod repository;
mod validation;

pub use entity::{Email, User};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_required_fields, validate_username, UserValidationError,
};
