//! 各检验工序的计数器
//!
//! 计数均为非负整数，JSON 中的负数在反序列化阶段即被拒绝

use serde::{Deserialize, Serialize};

use super::RejectionEntry;

/// 单个计数字段、不良数量与月度目标的上限
pub const MAX_COUNT: u64 = 1_000_000_000;

/// 计数求和，溢出时停在 `u64::MAX`
pub fn saturating_sum(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// 来料检验
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialInspection {
    pub washing_pending: u64,
    pub multigauge_pending: u64,
}

/// 终检 - 综合检具
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultigaugeInspection {
    /// 恒等于 ok + not_ok，保存时重算
    pub total: u64,
    pub ok: u64,
    pub not_ok: u64,
}

/// 终检 - 外观
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualInspection {
    pub pending: u64,
    pub visual_done: u64,
    pub ok: u64,
    pub not_ok: u64,
}

/// 终检
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalInspection {
    pub multigauge: MultigaugeInspection,
    pub visual: VisualInspection,
}

/// 第三方检验
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TpiInspection {
    pub pending: u64,
    pub done: u64,
    pub ok: u64,
    pub not_ok: u64,
}

/// 累计值 + 当日值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunningCount {
    pub cumulative: u64,
    pub today: u64,
}

/// 待发运 (RFD) 与实际发运
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchSection {
    pub rfd: RunningCount,
    pub dispatch: RunningCount,
}

/// 一个班次录入的全部检验数据（不含业务键）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionData {
    pub material_inspection: MaterialInspection,
    pub final_inspection: FinalInspection,
    pub tpi_inspection: TpiInspection,
    pub dispatch: DispatchSection,
    pub rejections: Vec<RejectionEntry>,
    pub tpi_rejections: Vec<RejectionEntry>,
}

impl InspectionData {
    /// 终检不良数量合计
    pub fn final_rejection_quantity(&self) -> u64 {
        saturating_sum(self.rejections.iter().map(|r| r.quantity))
    }

    /// TPI 不良数量合计
    pub fn tpi_rejection_quantity(&self) -> u64 {
        saturating_sum(self.tpi_rejections.iter().map(|r| r.quantity))
    }

    /// 工序不良：综合检具 + 外观
    pub fn process_step_not_ok(&self) -> u64 {
        self.final_inspection
            .multigauge
            .not_ok
            .saturating_add(self.final_inspection.visual.not_ok)
    }
}
