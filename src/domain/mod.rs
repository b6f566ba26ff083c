//! Domain layer - Core business logic and entities

pub mod error;
pub mod storage;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use storage::{DocumentFilter, Storage, StorageEntity, StorageKey};
pub use team::{Team, TeamAlias, TeamRepository, TeamResourceCleaner};
pub use user::{Email, User, UserRepository};
