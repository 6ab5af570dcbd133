//! 看板与报表查询

use chrono::NaiveDate;
use zen_errors::{AppError, AppResult};

use crate::domain::enums::{PartName, Shift};
use crate::domain::services::{ParetoWindow, PartFilter};

/// 看板查询
#[derive(Debug, Clone)]
pub struct DashboardQuery {
    pub part_filter: PartFilter,
    pub reference_date: NaiveDate,
}

/// 缺陷柏拉图查询
#[derive(Debug, Clone)]
pub struct DefectParetoQuery {
    pub window: ParetoWindow,
    pub today: NaiveDate,
}

/// TPI 区间报表查询
#[derive(Debug, Clone)]
pub struct TpiReportQuery {
    pub part_filter: PartFilter,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TpiReportQuery {
    pub fn validate(&self) -> AppResult<()> {
        if self.from > self.to {
            return Err(AppError::validation(format!(
                "Start date {} is after end date {}",
                self.from, self.to
            )));
        }
        Ok(())
    }
}

/// 当日待检查询
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub date: NaiveDate,
}

/// 零件日报查询
#[derive(Debug, Clone)]
pub struct PartReportQuery {
    pub part_name: PartName,
    pub date: NaiveDate,
    pub shift: Option<Shift>,
}
