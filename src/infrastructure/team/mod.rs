//! Team infrastructure implementations

mod repository;
mod resources;
mod service;

pub use repository::StorageTeamRepository;
pub use resources::DetachedResourceCleaner;
pub use service::{
    CreateTeamRequest, TeamService, TeamServiceTrait, DUPLICATE_ALIAS, TEAM_NOT_FOUND,
};
