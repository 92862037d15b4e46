//! Energy Co-op Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions
//! - Persistence trait abstractions
//! - Domain model types returned by the persistence traits

pub mod entity;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export persistence traits
pub use traits::{
    AlertPersistence, PersistenceService, SavingsRatePersistence, StatsPersistence,
};

// Re-export SQL backend
pub use sql::ExternalDbPersistService;

// Re-export model types
pub use model::{Alert, GenerationStat, PerformanceStat, SavingsRate};
