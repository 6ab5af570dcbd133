//! 内存仓储
//!
//! 未配置数据库时的默认存储，进程退出即丢失

use async_trait::async_trait;
use tokio::sync::RwLock;
use zen_common::UserId;
use zen_domain_core::{Entity, Keyed};
use zen_errors::{AppError, AppResult};

use crate::domain::entities::{
    DefectVocabulary, InspectionRecord, MonthlyTargets, UserProfile, sort_newest_first,
};
use crate::domain::enums::{PartName, UserRole, UserStatus};
use crate::domain::repositories::{
    AppSettingsRepository, InspectionRecordRepository, UserProfileRepository,
};
use crate::domain::value_objects::{InspectionRecordId, RecordKey};

// ============================================================================
// InspectionRecordRepository 实现
// ============================================================================

#[derive(Default)]
pub struct InMemoryInspectionRecordRepository {
    records: RwLock<Vec<InspectionRecord>>,
}

impl InMemoryInspectionRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<InspectionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl InspectionRecordRepository for InMemoryInspectionRecordRepository {
    async fn list(&self) -> AppResult<Vec<InspectionRecord>> {
        let mut records = self.records.read().await.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn find_by_id(&self, id: &InspectionRecordId) -> AppResult<Option<InspectionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_key(&self, key: &RecordKey) -> AppResult<Option<InspectionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.has_key(key)).cloned())
    }

    async fn save(&self, record: &InspectionRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.has_key(&record.key())) {
            return Err(AppError::conflict(format!("Record for {} already exists", record.key())));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &InspectionRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| AppError::not_found(format!("Inspection record {} not found", record.id())))?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, id: &InspectionRecordId) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(AppError::not_found(format!("Inspection record {} not found", id)));
        }
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let deleted = records.len() as u64;
        records.clear();
        Ok(deleted)
    }
}

// ============================================================================
// AppSettingsRepository 实现
// ============================================================================

#[derive(Default)]
pub struct InMemoryAppSettingsRepository {
    targets: RwLock<MonthlyTargets>,
    vocabulary: RwLock<DefectVocabulary>,
}

impl InMemoryAppSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryAppSettingsRepository {
    async fn get_monthly_targets(&self) -> AppResult<MonthlyTargets> {
        Ok(self.targets.read().await.clone())
    }

    async fn set_monthly_target(&self, part: PartName, target: u64) -> AppResult<MonthlyTargets> {
        let mut targets = self.targets.write().await;
        targets.set(part, target);
        Ok(targets.clone())
    }

    async fn get_defect_vocabulary(&self) -> AppResult<DefectVocabulary> {
        Ok(self.vocabulary.read().await.clone())
    }

    async fn add_defect_type(&self, name: &str) -> AppResult<String> {
        self.vocabulary.write().await.add(name)
    }
}

// ============================================================================
// UserProfileRepository 实现
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserProfileRepository {
    profiles: RwLock<Vec<UserProfile>>,
}

impl InMemoryUserProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    async fn modify<F>(&self, uid: &UserId, change: F) -> AppResult<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| &p.uid == uid)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", uid)))?;
        change(profile);
        Ok(profile.clone())
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_by_uid(&self, uid: &UserId) -> AppResult<Option<UserProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| &p.uid == uid).cloned())
    }

    async fn list(&self) -> AppResult<Vec<UserProfile>> {
        Ok(self.profiles.read().await.clone())
    }

    async fn save(&self, profile: &UserProfile) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.uid == profile.uid) {
            return Err(AppError::conflict(format!("Profile for {} already exists", profile.uid)));
        }
        profiles.push(profile.clone());
        Ok(())
    }

    async fn update_role(&self, uid: &UserId, role: UserRole) -> AppResult<UserProfile> {
        self.modify(uid, |p| p.change_role(role)).await
    }

    async fn update_status(&self, uid: &UserId, status: UserStatus) -> AppResult<UserProfile> {
        self.modify(uid, |p| p.change_status(status)).await
    }
}
