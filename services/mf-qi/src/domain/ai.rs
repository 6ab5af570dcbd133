//! AI 协作服务
//!
//! 状态建议与进度报告图片均由外部模型生成，这里只定义输入输出和端口

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zen_errors::{AppError, AppResult};

use crate::domain::entities::InspectionRecord;
use crate::domain::enums::{AiSection, AiSubsection, PartName};

/// 状态建议请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSuggestionRequest {
    pub part_name: PartName,
    pub section: AiSection,
    pub subsection: AiSubsection,
    /// 该零件历史记录的 JSON 数组
    pub historical_data: String,
}

impl StatusSuggestionRequest {
    pub fn validate(&self) -> AppResult<()> {
        if !self.section.contains(self.subsection) {
            return Err(AppError::validation(format!(
                "Subsection {:?} does not belong to section {:?}",
                self.subsection, self.section
            )));
        }
        Ok(())
    }
}

/// 状态建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSuggestion {
    pub suggested_status: String,
    /// 0 到 1
    pub confidence_level: f64,
    pub rationale: String,
}

impl StatusSuggestion {
    /// 校验模型返回的置信度
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_level) {
            return Err(AppError::external_service(format!(
                "Suggestion confidence {} is outside [0, 1]",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

/// 图片中的单零件进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartProgress {
    pub name: PartName,
    pub target: u64,
    pub inspected: u64,
    pub ok: u64,
}

/// 报告图片请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportImageRequest {
    pub parts_progress: Vec<PartProgress>,
    pub report_date: NaiveDate,
}

/// 报告图片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportImage {
    /// `data:image/png;base64,...`
    pub image_data_uri: String,
    pub image_prompt: String,
}

impl ReportImage {
    pub fn validate(&self) -> AppResult<()> {
        if self.image_data_uri.trim().is_empty() {
            return Err(AppError::external_service(
                "Image generation failed or returned no image data.",
            ));
        }
        Ok(())
    }
}

/// 状态建议服务
#[async_trait]
pub trait StatusSuggestionService: Send + Sync {
    async fn suggest(&self, request: StatusSuggestionRequest) -> AppResult<StatusSuggestion>;
}

/// 报告图片服务
#[async_trait]
pub trait ReportImageService: Send + Sync {
    async fn generate(&self, request: ReportImageRequest) -> AppResult<ReportImage>;
}

/// 该零件的历史记录（快照顺序），去掉 id、零件名和审计字段
pub fn historical_data_json(records: &[InspectionRecord], part: PartName) -> AppResult<String> {
    let history = records
        .iter()
        .filter(|r| r.part_name == part)
        .map(|r| {
            let mut value = serde_json::to_value(r)
                .map_err(|e| AppError::internal(format!("Failed to serialize record: {}", e)))?;
            if let Some(object) = value.as_object_mut() {
                object.remove("id");
                object.remove("partName");
                object.remove("auditInfo");
            }
            Ok(value)
        })
        .collect::<AppResult<Vec<_>>>()?;

    serde_json::to_string(&history)
        .map_err(|e| AppError::internal(format!("Failed to serialize history: {}", e)))
}
