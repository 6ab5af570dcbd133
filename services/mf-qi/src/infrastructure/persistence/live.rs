//! 实时快照存储
//!
//! 包装任意记录仓储，每次写入成功后重新读取并发布一份完整快照。
//! 读取列表时优先使用已发布的快照

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use zen_errors::AppResult;
use zen_ports::{Snapshot, SnapshotFeed, SnapshotPublisher};

use crate::domain::entities::{InspectionRecord, sort_newest_first};
use crate::domain::repositories::InspectionRecordRepository;
use crate::domain::value_objects::{InspectionRecordId, RecordKey};
use crate::infrastructure::observability::metrics as qi_metrics;

pub struct LiveRecordStore {
    inner: Arc<dyn InspectionRecordRepository>,
    publisher: SnapshotPublisher<InspectionRecord>,
    /// 串行化 读取-发布，保证后发布的快照不旧于先发布的
    refresh_lock: Mutex<()>,
}

impl LiveRecordStore {
    pub fn new(inner: Arc<dyn InspectionRecordRepository>) -> Self {
        Self {
            inner,
            publisher: SnapshotPublisher::new(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// 从底层存储重新加载并发布快照，返回快照版本号
    pub async fn refresh(&self) -> AppResult<u64> {
        let _guard = self.refresh_lock.lock().await;

        let mut records = self.inner.list().await?;
        sort_newest_first(&mut records);
        qi_metrics::record_snapshot_size(records.len());

        let count = records.len();
        let version = self.publisher.publish(records);
        debug!(version, count, "Inspection record snapshot refreshed");
        Ok(version)
    }

    pub fn current(&self) -> Snapshot<InspectionRecord> {
        self.publisher.current()
    }

    /// 写入已成功，刷新失败只记录告警
    async fn refresh_after_write(&self, operation: &str) {
        if let Err(e) = self.refresh().await {
            warn!(operation, error = %e, "Failed to refresh snapshot after write");
        }
    }
}

impl SnapshotFeed<InspectionRecord> for LiveRecordStore {
    fn subscribe(&self) -> watch::Receiver<Snapshot<InspectionRecord>> {
        self.publisher.subscribe()
    }
}

#[async_trait]
impl InspectionRecordRepository for LiveRecordStore {
    async fn list(&self) -> AppResult<Vec<InspectionRecord>> {
        let snapshot = self.publisher.current();
        if snapshot.is_loaded() {
            return Ok(snapshot.items.as_ref().clone());
        }
        self.inner.list().await
    }

    async fn find_by_id(&self, id: &InspectionRecordId) -> AppResult<Option<InspectionRecord>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_key(&self, key: &RecordKey) -> AppResult<Option<InspectionRecord>> {
        self.inner.find_by_key(key).await
    }

    async fn save(&self, record: &InspectionRecord) -> AppResult<()> {
        self.inner.save(record).await?;
        self.refresh_after_write("save").await;
        Ok(())
    }

    async fn update(&self, record: &InspectionRecord) -> AppResult<()> {
        self.inner.update(record).await?;
        self.refresh_after_write("update").await;
        Ok(())
    }

    async fn delete(&self, id: &InspectionRecordId) -> AppResult<()> {
        self.inner.delete(id).await?;
        self.refresh_after_write("delete").await;
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let deleted = self.inner.clear_all().await?;
        self.refresh_after_write("clear_all").await;
        Ok(deleted)
    }
}
