//! 仓储接口

mod app_settings_repository;
mod inspection_record_repository;
mod user_profile_repository;

pub use app_settings_repository::*;
pub use inspection_record_repository::*;
pub use user_profile_repository::*;
