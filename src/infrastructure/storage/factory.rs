//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{connect_pool, PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Opens collections on the configured backend
///
/// Postgres collections share one connection pool.
#[derive(Debug, Clone)]
pub struct StorageFactory {
    pool: Option<PgPool>,
}

impl StorageFactory {
    pub async fn connect(config: &StorageConfig) -> Result<Self, DomainError> {
        let pool = match config {
            StorageConfig::InMemory => None,
            StorageConfig::Postgres(pg_config) => Some(connect_pool(pg_config).await?),
        };

        Ok(Self { pool })
    }

    /// Factory that only hands out in-memory collections
    pub fn in_memory() -> Self {
        Self { pool: None }
    }

    pub fn storage_type(&self) -> StorageType {
        if self.pool.is_some() {
            StorageType::Postgres
        } else {
            StorageType::InMemory
        }
    }

    /// Opens (creating if needed) the named collection
    pub async fn collection<E>(
        &self,
        name: &str,
        unique_fields: &[&str],
    ) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match &self.pool {
            None => Ok(Arc::new(
                InMemoryStorage::<E>::new().with_unique_fields(unique_fields),
            )),
            Some(pool) => {
                let storage =
                    PostgresStorage::<E>::new(pool.clone(), name).with_unique_fields(unique_fields);
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}
