//! Infrastructure layer - Storage backends, services and security primitives

pub mod auth;
pub mod logging;
pub mod storage;
pub mod team;
pub mod user;
