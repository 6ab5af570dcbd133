//! 请求与响应 DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zen_errors::{AppError, AppResult};

use crate::domain::ai::ReportImage;
use crate::domain::entities::InspectionRecord;
use crate::domain::enums::{AiSection, AiSubsection, PartName, Shift, UserRole, UserStatus};
use crate::domain::services::{ParetoWindow, ProgressReport, ReportShift};
use crate::domain::value_objects::InspectionData;

/// 未指定日期时取服务器本地日期
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ========== 检验记录 ==========

/// (日期, 零件, 班次) 查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKeyParams {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryRequest {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
    #[serde(flatten)]
    pub data: InspectionData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryResponse {
    pub record: InspectionRecord,
    pub created: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRecordsResponse {
    pub deleted: u64,
    pub message: String,
}

// ========== 看板与报表 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParams {
    /// 缺省为全部零件
    pub part: Option<PartName>,
    pub date: Option<NaiveDate>,
}

/// 时间窗口参数
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WindowParam {
    #[default]
    All,
    Last7Days,
    CurrentMonth,
    Range,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoParams {
    #[serde(default)]
    pub window: WindowParam,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub today: Option<NaiveDate>,
}

impl ParetoParams {
    pub fn window(&self) -> AppResult<ParetoWindow> {
        match self.window {
            WindowParam::All => Ok(ParetoWindow::AllTime),
            WindowParam::Last7Days => Ok(ParetoWindow::Last7Days),
            WindowParam::CurrentMonth => Ok(ParetoWindow::CurrentMonth),
            WindowParam::Range => match (self.from, self.to) {
                (Some(from), Some(to)) if from <= to => Ok(ParetoWindow::Range { from, to }),
                (Some(_), Some(_)) => Err(AppError::validation("`from` must not be after `to`")),
                _ => Err(AppError::validation("Range window requires `from` and `to`")),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TpiReportParams {
    pub part: Option<PartName>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartReportParams {
    pub date: Option<NaiveDate>,
    pub shift: Option<Shift>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReportRequest {
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub shift: ReportShift,
    #[serde(default = "default_include_image")]
    pub include_image: bool,
}

fn default_include_image() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReportResponse {
    pub report: ProgressReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ReportImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_error: Option<String>,
}

// ========== 设置 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTargetRequest {
    pub part_name: PartName,
    pub target: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectTypesResponse {
    pub defects: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDefectTypeRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDefectTypeResponse {
    pub added: String,
}

// ========== 用户 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: String,
    pub mobile: String,
    pub requested_role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

// ========== AI ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub part_name: PartName,
    pub section: AiSection,
    pub subsection: AiSubsection,
}
