//! Queries module

pub mod record_queries;
pub mod report_queries;

pub use record_queries::*;
pub use report_queries::*;
