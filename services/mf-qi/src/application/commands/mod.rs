//! Commands module

pub mod admin_commands;
pub mod record_commands;
pub mod report_commands;

pub use admin_commands::*;
pub use record_commands::*;
pub use report_commands::*;
