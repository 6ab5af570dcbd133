//! 不良柏拉图
//!
//! 按分组键汇总不良数量，降序排列并给出累计占比。数量相同的分组保持
//! 首次出现的顺序（缺陷柏拉图按快照扫描顺序，零件柏拉图按零件固定顺序）

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zen_common::{first_day_of_month, trailing_window_start};

use crate::domain::entities::InspectionRecord;
use crate::domain::enums::PartName;
use crate::domain::value_objects::saturating_sum;

use super::metrics::PartFilter;

/// 统计时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ParetoWindow {
    #[default]
    AllTime,
    /// 含今天在内的最近 7 天
    Last7Days,
    /// 本月 1 日至今天
    CurrentMonth,
    /// 闭区间
    Range { from: NaiveDate, to: NaiveDate },
}

impl ParetoWindow {
    /// 窗口闭区间，全时段为 None
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            ParetoWindow::AllTime => None,
            ParetoWindow::Last7Days => Some((trailing_window_start(today, 7), today)),
            ParetoWindow::CurrentMonth => Some((first_day_of_month(today), today)),
            ParetoWindow::Range { from, to } => Some((*from, *to)),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.bounds(today) {
            None => true,
            Some((from, to)) => from <= date && date <= to,
        }
    }
}

/// 柏拉图条目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoEntry {
    pub name: String,
    pub rejection_count: u64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
}

/// 保持首次出现顺序的计数器
#[derive(Debug, Default)]
struct OrderedTally {
    order: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl OrderedTally {
    fn add(&mut self, key: &str, quantity: u64) {
        match self.index.get(key) {
            Some(&i) => self.order[i].1 = self.order[i].1.saturating_add(quantity),
            None => {
                self.index.insert(key.to_string(), self.order.len());
                self.order.push((key.to_string(), quantity));
            }
        }
    }

    fn into_groups(self) -> Vec<(String, u64)> {
        self.order
    }
}

/// 由按首次出现顺序排列的分组生成柏拉图
pub fn build_pareto(groups: Vec<(String, u64)>) -> Vec<ParetoEntry> {
    let total = saturating_sum(groups.iter().map(|(_, quantity)| *quantity));
    if total == 0 {
        return Vec::new();
    }

    let mut groups: Vec<(String, u64)> = groups.into_iter().filter(|(_, q)| *q > 0).collect();
    // sort_by 为稳定排序
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let mut cumulative = 0.0;
    groups
        .into_iter()
        .map(|(name, quantity)| {
            let percentage = quantity as f64 / total as f64 * 100.0;
            cumulative += percentage;
            ParetoEntry {
                name,
                rejection_count: quantity,
                percentage,
                cumulative_percentage: cumulative.min(100.0),
            }
        })
        .collect()
}

/// 缺陷柏拉图：终检与 TPI 不良一并按缺陷类型汇总
pub fn defect_pareto(records: &[InspectionRecord], window: ParetoWindow, today: NaiveDate) -> Vec<ParetoEntry> {
    let mut tally = OrderedTally::default();
    for record in records.iter().filter(|r| window.contains(r.date, today)) {
        for rejection in record.data.rejections.iter().chain(&record.data.tpi_rejections) {
            tally.add(&rejection.defect_type, rejection.quantity);
        }
    }
    build_pareto(tally.into_groups())
}

/// TPI 柏拉图：TPI 不良按零件汇总
pub fn tpi_part_pareto(
    records: &[InspectionRecord],
    filter: PartFilter,
    window: ParetoWindow,
    today: NaiveDate,
) -> Vec<ParetoEntry> {
    let groups = PartName::ALL
        .iter()
        .filter(|part| filter.matches(**part))
        .map(|part| {
            let quantity = saturating_sum(
                records
                    .iter()
                    .filter(|r| r.part_name == *part && window.contains(r.date, today))
                    .map(|r| r.data.tpi_rejection_quantity()),
            );
            (part.as_str().to_string(), quantity)
        })
        .collect();
    build_pareto(groups)
}
