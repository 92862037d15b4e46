//! SeaORM entities

pub mod alert;
pub mod generation_stat_entry;
pub mod performance_stat_entry;
pub mod savings_rate;

pub mod prelude {
    pub use super::alert::Entity as AlertEntry;
    pub use super::generation_stat_entry::Entity as GenerationStatEntry;
    pub use super::performance_stat_entry::Entity as PerformanceStatEntry;
    pub use super::savings_rate::Entity as SavingsRateEntry;
}
