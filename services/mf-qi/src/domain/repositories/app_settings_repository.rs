//! 应用设置 Repository trait

use async_trait::async_trait;
use zen_errors::AppResult;

use crate::domain::entities::{DefectVocabulary, MonthlyTargets};
use crate::domain::enums::PartName;

#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// 月度目标，未设置时为空
    async fn get_monthly_targets(&self) -> AppResult<MonthlyTargets>;

    /// 设置单个零件的月度目标，其他零件不变
    async fn set_monthly_target(&self, part: PartName, target: u64) -> AppResult<MonthlyTargets>;

    /// 缺陷类型词表，未初始化时为初始列表
    async fn get_defect_vocabulary(&self) -> AppResult<DefectVocabulary>;

    /// 追加缺陷类型（忽略大小写去重），返回追加的名称
    async fn add_defect_type(&self, name: &str) -> AppResult<String>;
}
