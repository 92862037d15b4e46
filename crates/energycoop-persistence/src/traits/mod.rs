//! Persistence traits for the storage abstraction layer
//!
//! Services depend on these traits, not on SeaORM, so they can be tested
//! against in-memory fakes.

pub mod alert;
pub mod savings_rate;
pub mod stats;

pub use alert::AlertPersistence;
pub use savings_rate::SavingsRatePersistence;
pub use stats::StatsPersistence;

use async_trait::async_trait;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService:
    StatsPersistence + AlertPersistence + SavingsRatePersistence + Send + Sync
{
    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
