//! 检验记录 Repository trait

use async_trait::async_trait;
use zen_errors::AppResult;

use crate::domain::entities::InspectionRecord;
use crate::domain::value_objects::{InspectionRecordId, RecordKey};

#[async_trait]
pub trait InspectionRecordRepository: Send + Sync {
    /// 全部记录，日期倒序、同日 B 在 A 之前
    async fn list(&self) -> AppResult<Vec<InspectionRecord>>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: &InspectionRecordId) -> AppResult<Option<InspectionRecord>>;

    /// 根据 (日期, 零件, 班次) 查找
    async fn find_by_key(&self, key: &RecordKey) -> AppResult<Option<InspectionRecord>>;

    /// 新建记录
    async fn save(&self, record: &InspectionRecord) -> AppResult<()>;

    /// 整体覆盖已有记录
    async fn update(&self, record: &InspectionRecord) -> AppResult<()>;

    /// 删除记录
    async fn delete(&self, id: &InspectionRecordId) -> AppResult<()>;

    /// 清空全部记录，返回删除条数
    async fn clear_all(&self) -> AppResult<u64>;
}
