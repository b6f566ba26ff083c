//! Storage gateway - document persistence shared by users and teams

mod entity;
mod filter;
mod repository;

pub use entity::{StorageEntity, StorageKey};
pub use filter::{Condition, DocumentFilter};
pub use repository::Storage;

#[cfg(test)]
pub use repository::mock;
