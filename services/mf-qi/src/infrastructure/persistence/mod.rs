//! Persistence implementations

mod converters;
mod live;
mod memory;
mod postgres;
mod rows;

pub use live::LiveRecordStore;
pub use memory::{InMemoryAppSettingsRepository, InMemoryInspectionRecordRepository, InMemoryUserProfileRepository};
pub use postgres::{
    PostgresAppSettingsRepository, PostgresInspectionRecordRepository, PostgresUserProfileRepository,
    ensure_schema,
};
