//! 集成测试公共夹具

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use zen_common::UserId;
use zen_errors::{AppError, AppResult};

use mf_qi::application::ServiceHandler;
use mf_qi::domain::ai::{
    ReportImage, ReportImageRequest, ReportImageService, StatusSuggestion, StatusSuggestionRequest,
    StatusSuggestionService,
};
use mf_qi::domain::entities::{InspectionRecord, Session, UserProfile};
use mf_qi::domain::enums::{PartName, Shift, UserRole, UserStatus};
use mf_qi::domain::repositories::InspectionRecordRepository;
use mf_qi::domain::value_objects::{InspectionData, InspectionRecordId, RecordKey};
use mf_qi::infrastructure::persistence::{
    InMemoryAppSettingsRepository, InMemoryInspectionRecordRepository, InMemoryUserProfileRepository,
};

pub const ADMIN: &str = "admin-1";
pub const FINAL: &str = "final-1";
pub const TPI: &str = "tpi-1";
pub const VIEWER: &str = "viewer-1";
pub const PENDING: &str = "pending-1";

pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

pub fn profile(uid: &str, role: UserRole, status: UserStatus) -> UserProfile {
    let mut profile = UserProfile::register(UserId::from(uid), None, uid, "9000000000", Some(role));
    profile.change_status(status);
    profile
}

pub fn staff() -> Vec<UserProfile> {
    vec![
        profile(ADMIN, UserRole::Admin, UserStatus::Active),
        profile(FINAL, UserRole::FinalInspector, UserStatus::Active),
        profile(TPI, UserRole::TpiInspector, UserStatus::Active),
        profile(VIEWER, UserRole::DataViewer, UserStatus::Active),
        profile(PENDING, UserRole::FinalInspector, UserStatus::PendingApproval),
    ]
}

pub fn session(uid: &str, role: UserRole) -> Session {
    Session::new(UserId::from(uid), role, UserStatus::Active)
}

/// 只带派送数据的记录
pub fn dispatch_record(date: NaiveDate, part: PartName, shift: Shift, rfd: u64, dispatch: u64) -> InspectionRecord {
    let mut data = InspectionData::default();
    data.dispatch.rfd.cumulative = rfd;
    data.dispatch.dispatch.cumulative = dispatch;
    InspectionRecord::new(RecordKey::new(date, part, shift), data, None)
}

/// 可控的 AI 假实现
pub struct FakeAi {
    pub image_fails: bool,
    pub confidence: f64,
    pub calls: AtomicUsize,
}

impl FakeAi {
    pub fn ok() -> Self {
        Self {
            image_fails: false,
            confidence: 0.8,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_image() -> Self {
        Self {
            image_fails: true,
            ..Self::ok()
        }
    }

    pub fn with_confidence(confidence: f64) -> Self {
        Self {
            confidence,
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSuggestionService for FakeAi {
    async fn suggest(&self, request: StatusSuggestionRequest) -> AppResult<StatusSuggestion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(StatusSuggestion {
            suggested_status: format!("Keep {:?} moving", request.subsection),
            confidence_level: self.confidence,
            rationale: format!("history bytes: {}", request.historical_data.len()),
        })
    }
}

#[async_trait]
impl ReportImageService for FakeAi {
    async fn generate(&self, request: ReportImageRequest) -> AppResult<ReportImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.image_fails {
            return Err(AppError::external_service("image model unavailable"));
        }
        Ok(ReportImage {
            image_data_uri: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            image_prompt: format!("{} parts on {}", request.parts_progress.len(), request.report_date),
        })
    }
}

/// 第一次按键查找时看不到已有记录，模拟查找与插入之间另一请求先写入
pub struct LateInsertRecordRepository {
    pub inner: Arc<InMemoryInspectionRecordRepository>,
    missed: AtomicBool,
}

impl LateInsertRecordRepository {
    pub fn new(inner: Arc<InMemoryInspectionRecordRepository>) -> Self {
        Self {
            inner,
            missed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl InspectionRecordRepository for LateInsertRecordRepository {
    async fn list(&self) -> AppResult<Vec<InspectionRecord>> {
        self.inner.list().await
    }

    async fn find_by_id(&self, id: &InspectionRecordId) -> AppResult<Option<InspectionRecord>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_key(&self, key: &RecordKey) -> AppResult<Option<InspectionRecord>> {
        if !self.missed.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_key(key).await
    }

    async fn save(&self, record: &InspectionRecord) -> AppResult<()> {
        self.inner.save(record).await
    }

    async fn update(&self, record: &InspectionRecord) -> AppResult<()> {
        self.inner.update(record).await
    }

    async fn delete(&self, id: &InspectionRecordId) -> AppResult<()> {
        self.inner.delete(id).await
    }

    async fn clear_all(&self) -> AppResult<u64> {
        self.inner.clear_all().await
    }
}

/// 基于内存仓储的处理器
pub struct Harness {
    pub handler: ServiceHandler,
    pub records: Arc<InMemoryInspectionRecordRepository>,
    pub profiles: Arc<InMemoryUserProfileRepository>,
    pub ai: Arc<FakeAi>,
}

pub fn harness_with(records: Vec<InspectionRecord>, ai: FakeAi) -> Harness {
    let record_repo = Arc::new(InMemoryInspectionRecordRepository::with_records(records));
    let profile_repo = Arc::new(InMemoryUserProfileRepository::with_profiles(staff()));
    let ai = Arc::new(ai);

    let handler = ServiceHandler::new(
        record_repo.clone(),
        Arc::new(InMemoryAppSettingsRepository::new()),
        profile_repo.clone(),
        ai.clone(),
        ai.clone(),
        "Test Report",
    );

    Harness {
        handler,
        records: record_repo,
        profiles: profile_repo,
        ai,
    }
}

pub fn harness() -> Harness {
    harness_with(Vec::new(), FakeAi::ok())
}

pub async fn stored(harness: &Harness, key: RecordKey) -> InspectionRecord {
    harness
        .records
        .find_by_key(&key)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("no record for {}", key))
}
