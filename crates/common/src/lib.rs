//! common - 通用类型和工具库

pub mod dates;
pub mod types;
pub mod utils;

pub use dates::*;
pub use types::*;
