//! 报告与 AI 命令

use chrono::NaiveDate;

use crate::domain::ai::ReportImage;
use crate::domain::enums::{AiSection, AiSubsection, PartName};
use crate::domain::services::{ProgressReport, ReportShift};

/// 生成进度报告命令
#[derive(Debug, Clone)]
pub struct GenerateProgressReportCommand {
    pub report_date: NaiveDate,
    pub shift: ReportShift,
    /// 为 false 时只生成文本
    pub include_image: bool,
}

/// 进度报告结果
///
/// 图片失败不影响文本，失败原因放在 `image_error`
#[derive(Debug, Clone)]
pub struct ProgressReportOutcome {
    pub report: ProgressReport,
    pub image: Option<ReportImage>,
    pub image_error: Option<String>,
}

/// 请求 AI 状态建议命令
#[derive(Debug, Clone)]
pub struct SuggestStatusCommand {
    pub part_name: PartName,
    pub section: AiSection,
    pub subsection: AiSubsection,
}
