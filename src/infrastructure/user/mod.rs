//! User infrastructure module
//!
//! Password hashing with Argon2, the storage-backed repository, the user
//! service and the team cascade run when a user is deleted.

mod cascade;
mod password;
mod repository;
mod service;

pub use cascade::{CascadeOutcome, TeamCascade};
pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::{StorageUserRepository, USER_UNIQUE_FIELDS};
pub use service::{
    CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceTrait, DUPLICATE_EMAIL,
    DUPLICATE_USERNAME, INVALID_CREDENTIALS, USER_NOT_FOUND,
};
