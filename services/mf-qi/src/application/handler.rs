//! Business logic handler

use std::sync::Arc;

use zen_common::UserId;
use zen_domain_core::{Entity, Keyed};
use zen_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::domain::ai::{
    ReportImageRequest, ReportImageService, StatusSuggestion, StatusSuggestionRequest,
    StatusSuggestionService, historical_data_json,
};
use crate::domain::entities::{DefectVocabulary, InspectionRecord, MonthlyTargets, Session, UserProfile};
use crate::domain::enums::{UserRole, UserStatus};
use crate::domain::repositories::{
    AppSettingsRepository, InspectionRecordRepository, UserProfileRepository,
};
use crate::domain::services::carry_forward::apply_carry_forward;
use crate::domain::value_objects::InspectionData;
use crate::domain::services::{
    CumulativeSeed, DashboardMetrics, PartDailyReport, ParetoEntry, PendingSummary, ProfileChange,
    TpiRangeReport, apply_derived_fields, build_progress_report, compute_dashboard,
    cumulative_before, defect_pareto, ensure_admin_remains, form_layout, merge_submission,
    part_daily_report, pending_summaries, tpi_range_report, validate_entry,
};
use crate::infrastructure::observability::metrics as qi_metrics;

use super::commands::*;
use super::queries::*;

pub struct ServiceHandler {
    record_repo: Arc<dyn InspectionRecordRepository>,
    settings_repo: Arc<dyn AppSettingsRepository>,
    profile_repo: Arc<dyn UserProfileRepository>,
    suggestion_service: Arc<dyn StatusSuggestionService>,
    image_service: Arc<dyn ReportImageService>,
    report_title: String,
}

impl ServiceHandler {
    pub fn new(
        record_repo: Arc<dyn InspectionRecordRepository>,
        settings_repo: Arc<dyn AppSettingsRepository>,
        profile_repo: Arc<dyn UserProfileRepository>,
        suggestion_service: Arc<dyn StatusSuggestionService>,
        image_service: Arc<dyn ReportImageService>,
        report_title: impl Into<String>,
    ) -> Self {
        Self {
            record_repo,
            settings_repo,
            profile_repo,
            suggestion_service,
            image_service,
            report_title: report_title.into(),
        }
    }

    // ========== 会话与档案 ==========

    /// 由用户 ID 解析会话，档案不存在视为未认证
    pub async fn resolve_session(&self, uid: &UserId) -> AppResult<Session> {
        let profile = self
            .profile_repo
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| AppError::unauthenticated(format!("No profile for user {}", uid)))?;
        Ok(Session::from_profile(&profile))
    }

    /// 注册档案：状态总是待审批
    pub async fn register_profile(&self, cmd: RegisterProfileCommand) -> AppResult<UserProfile> {
        cmd.validate()?;

        if self.profile_repo.find_by_uid(&cmd.uid).await?.is_some() {
            return Err(AppError::conflict(format!("Profile for {} already exists", cmd.uid)));
        }

        let profile = UserProfile::register(
            cmd.uid,
            cmd.email,
            cmd.name.trim(),
            cmd.mobile.trim(),
            cmd.requested_role,
        );
        self.profile_repo.save(&profile).await?;

        info!(uid = %profile.uid, role = profile.role.code(), "Profile registered, pending approval");
        Ok(profile)
    }

    /// 确保指定用户为激活管理员，用于首次部署
    pub async fn ensure_bootstrap_admin(&self, uid: UserId) -> AppResult<UserProfile> {
        let existing = self.profile_repo.find_by_uid(&uid).await?;
        let profile = match existing {
            Some(profile) if profile.is_active_admin() => return Ok(profile),
            Some(_) => {
                self.profile_repo.update_role(&uid, UserRole::Admin).await?;
                self.profile_repo.update_status(&uid, UserStatus::Active).await?
            }
            None => {
                let mut profile = UserProfile::register(uid, None, "Administrator", "", Some(UserRole::Admin));
                profile.change_status(UserStatus::Active);
                self.profile_repo.save(&profile).await?;
                profile
            }
        };

        info!(uid = %profile.uid, "Bootstrap admin ensured");
        Ok(profile)
    }

    // ========== 检验记录 ==========

    /// 全部记录（快照顺序）
    pub async fn list_records(&self, session: &Session) -> AppResult<Vec<InspectionRecord>> {
        session.require_active()?;
        self.record_repo.list().await
    }

    /// 加载录入表单：已有记录进入编辑模式，否则给出带结转值的空表单
    pub async fn load_entry(&self, session: &Session, query: LoadEntryQuery) -> AppResult<EntryForm> {
        session.require_active()?;

        let records = self.record_repo.list().await?;
        let seed = cumulative_before(&records, query.part_name, query.date, query.shift);
        let existing = self.record_repo.find_by_key(&query.key()).await?;

        let form = match existing {
            Some(record) => EntryForm {
                mode: EntryMode::Edit,
                record_id: Some(*record.id()),
                data: record.data,
                seed,
                layout: form_layout(session.role),
            },
            None => {
                let mut data = InspectionData::default();
                data.dispatch = apply_carry_forward(seed, 0, 0);
                EntryForm {
                    mode: EntryMode::Create,
                    record_id: None,
                    data,
                    seed,
                    layout: form_layout(session.role),
                }
            }
        };
        Ok(form)
    }

    /// 结转种子
    pub async fn carry_forward(&self, session: &Session, query: CarryForwardQuery) -> AppResult<CumulativeSeed> {
        session.require_active()?;
        let records = self.record_repo.list().await?;
        Ok(cumulative_before(&records, query.part_name, query.date, query.shift))
    }

    /// 保存录入
    ///
    /// 同一业务键最后一次写入生效；新建时若被并发写入抢先，按覆盖重做一次
    pub async fn save_entry(&self, session: &Session, cmd: SaveEntryCommand) -> AppResult<SaveEntryOutcome> {
        session.require_writer()?;

        let key = cmd.key();
        let outcome = match self.write_entry(session, &cmd).await {
            Err(AppError::Conflict(reason)) => {
                warn!(key = %key, reason = %reason, "Entry created concurrently, retrying as overwrite");
                self.write_entry(session, &cmd).await?
            }
            result => result?,
        };

        qi_metrics::record_entry_saved(key.part_name.slug(), key.shift.as_str(), outcome.created);
        info!(
            record_id = %outcome.record.id(),
            key = %key,
            created = outcome.created,
            uid = %session.uid,
            "Inspection entry saved"
        );
        Ok(outcome)
    }

    async fn write_entry(&self, session: &Session, cmd: &SaveEntryCommand) -> AppResult<SaveEntryOutcome> {
        let key = cmd.key();
        let existing = self.record_repo.find_by_key(&key).await?;

        let mut data = merge_submission(session.role, existing.as_ref().map(|r| &r.data), &cmd.data);

        let records = self.record_repo.list().await?;
        let seed = cumulative_before(&records, key.part_name, key.date, key.shift);
        apply_derived_fields(session.role, &mut data, seed);

        if let Err(errors) = validate_entry(&data) {
            qi_metrics::record_entry_rejected(errors.issues.len());
            return Err(errors.into());
        }

        let uid = Some(session.uid.clone());
        match existing {
            Some(mut record) => {
                record.replace_data(data, uid);
                self.record_repo.update(&record).await?;
                Ok(SaveEntryOutcome { record, created: false })
            }
            None => {
                let record = InspectionRecord::new(key, data, uid);
                self.record_repo.save(&record).await?;
                Ok(SaveEntryOutcome { record, created: true })
            }
        }
    }

    /// 删除单条记录
    pub async fn delete_record(&self, session: &Session, cmd: DeleteRecordCommand) -> AppResult<InspectionRecord> {
        session.require_writer()?;

        let record = self
            .record_repo
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inspection record {} not found", cmd.id)))?;

        self.record_repo.delete(&cmd.id).await?;
        qi_metrics::record_records_deleted(1);

        info!(record_id = %cmd.id, key = %record.key(), uid = %session.uid, "Inspection record deleted");
        Ok(record)
    }

    /// 清空全部记录
    pub async fn clear_all_records(&self, session: &Session) -> AppResult<ClearRecordsOutcome> {
        session.require_admin()?;

        let deleted = self.record_repo.clear_all().await?;
        qi_metrics::record_records_deleted(deleted);
        warn!(deleted, uid = %session.uid, "All inspection records cleared");

        let message = if deleted == 0 {
            "No inspection records found to delete."
        } else {
            "All inspection records have been cleared successfully."
        };
        Ok(ClearRecordsOutcome {
            deleted,
            message: message.to_string(),
        })
    }

    // ========== 看板与报表 ==========

    pub async fn dashboard(&self, session: &Session, query: DashboardQuery) -> AppResult<DashboardMetrics> {
        session.require_active()?;
        let records = self.record_repo.list().await?;
        let targets = self.settings_repo.get_monthly_targets().await?;
        Ok(compute_dashboard(&records, query.part_filter, query.reference_date, &targets))
    }

    pub async fn defect_pareto(&self, session: &Session, query: DefectParetoQuery) -> AppResult<Vec<ParetoEntry>> {
        session.require_active()?;
        let records = self.record_repo.list().await?;
        Ok(defect_pareto(&records, query.window, query.today))
    }

    pub async fn tpi_report(&self, session: &Session, query: TpiReportQuery) -> AppResult<TpiRangeReport> {
        session.require_active()?;
        query.validate()?;
        let records = self.record_repo.list().await?;
        Ok(tpi_range_report(&records, query.part_filter, query.from, query.to))
    }

    pub async fn pending(&self, session: &Session, query: PendingQuery) -> AppResult<Vec<PendingSummary>> {
        session.require_active()?;
        let records = self.record_repo.list().await?;
        Ok(pending_summaries(&records, query.date))
    }

    pub async fn part_report(&self, session: &Session, query: PartReportQuery) -> AppResult<PartDailyReport> {
        session.require_active()?;
        let records = self.record_repo.list().await?;
        Ok(part_daily_report(&records, query.part_name, query.date, query.shift))
    }

    /// 生成 WhatsApp 进度报告，图片失败时仍返回文本
    pub async fn generate_progress_report(
        &self,
        session: &Session,
        cmd: GenerateProgressReportCommand,
    ) -> AppResult<ProgressReportOutcome> {
        session.require_active()?;

        let records = self.record_repo.list().await?;
        let targets = self.settings_repo.get_monthly_targets().await?;
        let report = build_progress_report(&records, &targets, cmd.report_date, cmd.shift, &self.report_title);

        let mut outcome = ProgressReportOutcome {
            report,
            image: None,
            image_error: None,
        };
        if !cmd.include_image {
            return Ok(outcome);
        }

        let request = ReportImageRequest {
            parts_progress: outcome.report.parts_progress(),
            report_date: cmd.report_date,
        };
        match self.image_service.generate(request).await.and_then(|image| {
            image.validate()?;
            Ok(image)
        }) {
            Ok(image) => outcome.image = Some(image),
            Err(e) => {
                warn!(report_date = %cmd.report_date, error = %e, "Progress report image generation failed");
                outcome.image_error = Some(e.to_string());
            }
        }
        Ok(outcome)
    }

    // ========== 设置 ==========

    pub async fn monthly_targets(&self, session: &Session) -> AppResult<MonthlyTargets> {
        session.require_active()?;
        self.settings_repo.get_monthly_targets().await
    }

    pub async fn set_monthly_target(&self, session: &Session, cmd: SetMonthlyTargetCommand) -> AppResult<MonthlyTargets> {
        session.require_admin()?;
        cmd.validate()?;
        let targets = self.settings_repo.set_monthly_target(cmd.part_name, cmd.target).await?;
        info!(part = %cmd.part_name, target = cmd.target, uid = %session.uid, "Monthly target updated");
        Ok(targets)
    }

    pub async fn defect_types(&self, session: &Session) -> AppResult<DefectVocabulary> {
        session.require_active()?;
        self.settings_repo.get_defect_vocabulary().await
    }

    pub async fn add_defect_type(&self, session: &Session, cmd: AddDefectTypeCommand) -> AppResult<String> {
        session.require_admin()?;
        cmd.validate()?;
        let added = self.settings_repo.add_defect_type(&cmd.name).await?;
        info!(defect_type = %added, uid = %session.uid, "Defect type added");
        Ok(added)
    }

    // ========== 用户管理 ==========

    pub async fn list_users(&self, session: &Session) -> AppResult<Vec<UserProfile>> {
        session.require_admin()?;
        self.profile_repo.list().await
    }

    pub async fn update_user_role(&self, session: &Session, cmd: UpdateUserRoleCommand) -> AppResult<UserProfile> {
        session.require_admin()?;
        self.guard_profile_change(&cmd.uid, ProfileChange::Role(cmd.role)).await?;

        let profile = self.profile_repo.update_role(&cmd.uid, cmd.role).await?;
        info!(target_uid = %cmd.uid, role = cmd.role.code(), uid = %session.uid, "User role updated");
        Ok(profile)
    }

    pub async fn update_user_status(&self, session: &Session, cmd: UpdateUserStatusCommand) -> AppResult<UserProfile> {
        session.require_admin()?;
        self.guard_profile_change(&cmd.uid, ProfileChange::Status(cmd.status)).await?;

        let profile = self.profile_repo.update_status(&cmd.uid, cmd.status).await?;
        info!(target_uid = %cmd.uid, status = cmd.status.code(), uid = %session.uid, "User status updated");
        Ok(profile)
    }

    /// 基于仓储中的最新档案检查唯一激活管理员
    async fn guard_profile_change(&self, uid: &UserId, change: ProfileChange) -> AppResult<()> {
        let target = self
            .profile_repo
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", uid)))?;
        let profiles = self.profile_repo.list().await?;
        ensure_admin_remains(&target, change, &profiles)
    }

    // ========== AI ==========

    /// 基于该零件的历史记录请求状态建议
    pub async fn suggest_status(&self, session: &Session, cmd: SuggestStatusCommand) -> AppResult<StatusSuggestion> {
        session.require_active()?;

        let records = self.record_repo.list().await?;
        let request = StatusSuggestionRequest {
            part_name: cmd.part_name,
            section: cmd.section,
            subsection: cmd.subsection,
            historical_data: historical_data_json(&records, cmd.part_name)?,
        };
        request.validate()?;

        let suggestion = self.suggestion_service.suggest(request).await?;
        suggestion.validate()?;
        Ok(suggestion)
    }
}
