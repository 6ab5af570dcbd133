//! ports - 抽象 trait 层
//!
//! 定义基础设施与应用层之间共享的抽象接口

mod snapshot;

pub use snapshot::*;
