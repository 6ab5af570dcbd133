//! 看板派生指标

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zen_common::{previous_day, remaining_days_in_month};

use crate::domain::entities::{InspectionRecord, MonthlyTargets};
use crate::domain::enums::PartName;
use crate::domain::value_objects::saturating_sum;

use super::carry_forward::{latest_for_part, latest_on_or_before};

/// 零件过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PartFilter {
    #[default]
    All,
    Single(PartName),
}

impl PartFilter {
    pub fn parts(&self) -> Vec<PartName> {
        match self {
            PartFilter::All => PartName::ALL.to_vec(),
            PartFilter::Single(part) => vec![*part],
        }
    }

    pub fn matches(&self, part: PartName) -> bool {
        match self {
            PartFilter::All => true,
            PartFilter::Single(selected) => *selected == part,
        }
    }
}

impl From<Option<PartName>> for PartFilter {
    fn from(part: Option<PartName>) -> Self {
        part.map(PartFilter::Single).unwrap_or(PartFilter::All)
    }
}

/// 日均 RFD 需求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskingRate {
    /// 每日需完成数
    pub rate: u64,
    pub target_met: bool,
    /// 剩余需求；负数表示超额
    pub needed: i64,
    pub remaining_days: u32,
}

/// 外观检验结果构成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionBreakdown {
    pub ok: u64,
    pub not_ok: u64,
    /// 已检但既非 OK 也非 NG 的部分
    pub other: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDispatch {
    pub part_name: PartName,
    pub dispatched: u64,
}

/// 看板指标
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub part_filter: PartFilter,
    pub reference_date: NaiveDate,
    pub total_inspected: u64,
    pub total_ok_visual: u64,
    pub total_not_ok_visual: u64,
    pub total_cumulative_dispatched: u64,
    pub target: u64,
    pub overall_progress: f64,
    pub remaining_dispatch_qty: i64,
    pub asking_rate: AskingRate,
    pub inspection_breakdown: InspectionBreakdown,
    pub dispatched_by_part: Vec<PartDispatch>,
}

/// 总体进度百分比，目标为 0 时为 0，上限 100
pub fn overall_progress(ok_visual: u64, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (ok_visual as f64 / target as f64 * 100.0).min(100.0)
}

/// 截至参考日前一天各零件累计 RFD 之和（逐零件取最新记录）
fn cumulative_rfd_before(records: &[InspectionRecord], parts: &[PartName], reference_date: NaiveDate) -> u64 {
    let cutoff = previous_day(reference_date);
    saturating_sum(
        parts
            .iter()
            .filter_map(|part| latest_on_or_before(records, *part, cutoff))
            .map(|r| r.data.dispatch.rfd.cumulative),
    )
}

/// 超出 i64 范围的计数按 i64::MAX 处理
fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn asking_rate_from(target: u64, cumulative_rfd: u64, remaining_days: u32) -> AskingRate {
    let needed = signed(target).saturating_sub(signed(cumulative_rfd));
    if needed <= 0 {
        return AskingRate {
            rate: 0,
            target_met: true,
            needed,
            remaining_days,
        };
    }
    AskingRate {
        rate: (needed as u64).div_ceil(u64::from(remaining_days)),
        target_met: false,
        needed,
        remaining_days,
    }
}

/// 日均需求：目标与累计值先逐零件计算再合计
pub fn daily_asking_rate(
    records: &[InspectionRecord],
    filter: PartFilter,
    reference_date: NaiveDate,
    targets: &MonthlyTargets,
) -> AskingRate {
    let parts = filter.parts();
    let remaining_days = remaining_days_in_month(reference_date);
    let target = targets.sum_for(&parts);
    let cumulative = cumulative_rfd_before(records, &parts, reference_date);
    asking_rate_from(target, cumulative, remaining_days)
}

/// 单零件日均需求；未设定目标的零件不算达成
pub fn part_asking_rate(
    records: &[InspectionRecord],
    part: PartName,
    reference_date: NaiveDate,
    targets: &MonthlyTargets,
) -> AskingRate {
    let remaining_days = remaining_days_in_month(reference_date);
    let target = targets.get(part);
    if target == 0 {
        return AskingRate {
            rate: 0,
            target_met: false,
            needed: 0,
            remaining_days,
        };
    }
    let cumulative = cumulative_rfd_before(records, &[part], reference_date);
    asking_rate_from(target, cumulative, remaining_days)
}

/// 计算看板指标
pub fn compute_dashboard(
    records: &[InspectionRecord],
    filter: PartFilter,
    reference_date: NaiveDate,
    targets: &MonthlyTargets,
) -> DashboardMetrics {
    let (total_inspected, total_ok_visual, total_not_ok_visual) = records
        .iter()
        .filter(|r| filter.matches(r.part_name))
        .map(|r| &r.data.final_inspection.visual)
        .fold((0u64, 0u64, 0u64), |(done, ok, not_ok), v| {
            (
                done.saturating_add(v.visual_done),
                ok.saturating_add(v.ok),
                not_ok.saturating_add(v.not_ok),
            )
        });

    let dispatched_by_part: Vec<PartDispatch> = PartName::ALL
        .iter()
        .map(|part| PartDispatch {
            part_name: *part,
            dispatched: latest_for_part(records, *part)
                .map(|r| r.data.dispatch.dispatch.cumulative)
                .unwrap_or(0),
        })
        .collect();

    let total_cumulative_dispatched = saturating_sum(
        dispatched_by_part
            .iter()
            .filter(|p| filter.matches(p.part_name))
            .map(|p| p.dispatched),
    );

    let target = targets.sum_for(&filter.parts());

    DashboardMetrics {
        part_filter: filter,
        reference_date,
        total_inspected,
        total_ok_visual,
        total_not_ok_visual,
        total_cumulative_dispatched,
        target,
        overall_progress: overall_progress(total_ok_visual, target),
        remaining_dispatch_qty: signed(total_cumulative_dispatched).saturating_sub(signed(total_ok_visual)),
        asking_rate: daily_asking_rate(records, filter, reference_date, targets),
        inspection_breakdown: InspectionBreakdown {
            ok: total_ok_visual,
            not_ok: total_not_ok_visual,
            other: total_inspected.saturating_sub(total_ok_visual.saturating_add(total_not_ok_visual)),
        },
        dispatched_by_part,
    }
}
