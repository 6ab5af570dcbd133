//! mf-qi Service - InspectZen 制造检验数据服务
//!
//! 班次检验计数录入、RFD/发运累计结转、看板指标、不良柏拉图与进度报告

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
