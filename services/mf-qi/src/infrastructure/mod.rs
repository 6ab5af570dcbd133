//! Infrastructure layer

pub mod ai;
pub mod observability;
pub mod persistence;
