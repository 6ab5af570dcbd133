//! 可观测性

pub mod metrics;
