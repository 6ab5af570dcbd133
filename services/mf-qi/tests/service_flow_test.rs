//! 应用服务流程测试
//!
//! 内存仓储 + AI 假实现，覆盖录入、权限、管理与报告流程

mod common;

use std::sync::Arc;

use common::*;
use mf_qi::application::ServiceHandler;
use mf_qi::application::commands::*;
use mf_qi::application::queries::*;
use mf_qi::domain::enums::{AiSection, AiSubsection, PartName, Shift, UserRole, UserStatus};
use mf_qi::domain::repositories::InspectionRecordRepository;
use mf_qi::domain::services::{PartFilter, ReportShift};
use mf_qi::domain::value_objects::{InspectionData, InspectionRecordId, MAX_COUNT, RecordKey, RejectionEntry};
use mf_qi::infrastructure::persistence::{
    InMemoryAppSettingsRepository, InMemoryInspectionRecordRepository, InMemoryUserProfileRepository,
};
use zen_common::UserId;
use zen_domain_core::{Entity, Keyed};
use zen_errors::AppError;

const LAY: PartName = PartName::LayShaftAssy;

fn final_submission() -> InspectionData {
    let mut data = InspectionData::default();
    data.final_inspection.multigauge.ok = 12;
    data.final_inspection.multigauge.not_ok = 1;
    data.final_inspection.multigauge.total = 999;
    data.final_inspection.visual.ok = 40;
    data.final_inspection.visual.not_ok = 3;
    data.dispatch.rfd.today = 7;
    data.dispatch.rfd.cumulative = 5_000;
    data.dispatch.dispatch.today = 5;
    data.rejections = vec![RejectionEntry::new("Root burr", 3)];
    data
}

fn save(date: chrono::NaiveDate, shift: Shift, data: InspectionData) -> SaveEntryCommand {
    SaveEntryCommand {
        date,
        part_name: LAY,
        shift,
        data,
    }
}

// ============================================================================
// 录入
// ============================================================================

#[tokio::test]
async fn test_final_inspector_entry_derives_totals_and_carries_forward() {
    let h = harness_with(vec![dispatch_record(june(9), LAY, Shift::B, 100, 80)], FakeAi::ok());
    let inspector = session(FINAL, UserRole::FinalInspector);

    let outcome = h
        .handler
        .save_entry(&inspector, save(june(10), Shift::A, final_submission()))
        .await
        .unwrap();

    assert!(outcome.created);
    let data = &outcome.record.data;
    assert_eq!(data.final_inspection.multigauge.total, 13);
    assert_eq!(data.final_inspection.visual.visual_done, 43);
    assert_eq!(data.dispatch.rfd.cumulative, 107);
    assert_eq!(data.dispatch.dispatch.cumulative, 85);

    let stored = stored(&h, RecordKey::new(june(10), LAY, Shift::A)).await;
    assert_eq!(stored.data, outcome.record.data);
}

#[tokio::test]
async fn test_shift_b_entry_builds_on_shift_a() {
    let h = harness_with(vec![dispatch_record(june(9), LAY, Shift::B, 100, 80)], FakeAi::ok());
    let inspector = session(FINAL, UserRole::FinalInspector);

    h.handler
        .save_entry(&inspector, save(june(10), Shift::A, final_submission()))
        .await
        .unwrap();

    let mut shift_b = final_submission();
    shift_b.dispatch.rfd.today = 3;
    shift_b.dispatch.dispatch.today = 0;
    let outcome = h
        .handler
        .save_entry(&inspector, save(june(10), Shift::B, shift_b))
        .await
        .unwrap();

    assert_eq!(outcome.record.data.dispatch.rfd.cumulative, 110);
    assert_eq!(outcome.record.data.dispatch.dispatch.cumulative, 85);
}

#[tokio::test]
async fn test_saving_same_key_overwrites() {
    let h = harness();
    let inspector = session(FINAL, UserRole::FinalInspector);

    let first = h
        .handler
        .save_entry(&inspector, save(june(10), Shift::A, final_submission()))
        .await
        .unwrap();

    let mut corrected = final_submission();
    corrected.final_inspection.visual.ok = 41;
    let second = h
        .handler
        .save_entry(&inspector, save(june(10), Shift::A, corrected))
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.record.key(), second.record.key());

    let records = h.records.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data.final_inspection.visual.ok, 41);
}

#[tokio::test]
async fn test_tpi_inspector_keeps_final_inspection_counts() {
    let h = harness();

    h.handler
        .save_entry(
            &session(FINAL, UserRole::FinalInspector),
            save(june(10), Shift::A, final_submission()),
        )
        .await
        .unwrap();

    let mut tpi = InspectionData::default();
    tpi.tpi_inspection.ok = 15;
    tpi.tpi_inspection.not_ok = 1;
    tpi.tpi_rejections = vec![RejectionEntry::new("Teeth dent", 1)];
    let outcome = h
        .handler
        .save_entry(&session(TPI, UserRole::TpiInspector), save(june(10), Shift::A, tpi))
        .await
        .unwrap();

    let data = &outcome.record.data;
    assert_eq!(data.tpi_inspection.done, 16);
    assert_eq!(data.final_inspection.visual.ok, 40);
    assert_eq!(data.rejections, vec![RejectionEntry::new("Root burr", 3)]);
    assert_eq!(data.tpi_rejections.len(), 1);
}

#[tokio::test]
async fn test_invalid_admin_entry_reports_every_issue() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);

    let mut data = InspectionData::default();
    data.final_inspection.visual.visual_done = 10;
    data.final_inspection.visual.ok = 9;
    data.final_inspection.visual.not_ok = 5;
    data.rejections = vec![RejectionEntry::new("", 0)];

    let err = h
        .handler
        .save_entry(&admin, save(june(10), Shift::A, data))
        .await
        .unwrap_err();

    match err {
        AppError::InvalidFields(errors) => {
            assert!(errors.has_issue_for("finalInspection.visual.ok"));
            assert!(errors.has_issue_for("finalInspection.visual.notOk"));
            assert!(errors.has_issue_for("rejections.0.defectType"));
            assert!(errors.has_issue_for("rejections.0.quantity"));
        }
        other => panic!("expected field issues, got {:?}", other),
    }
    assert!(h.records.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_may_set_cumulative_directly() {
    let h = harness_with(vec![dispatch_record(june(9), LAY, Shift::B, 100, 80)], FakeAi::ok());

    let mut data = InspectionData::default();
    data.dispatch.rfd.today = 7;
    data.dispatch.rfd.cumulative = 500;
    let outcome = h
        .handler
        .save_entry(&session(ADMIN, UserRole::Admin), save(june(10), Shift::A, data))
        .await
        .unwrap();

    assert_eq!(outcome.record.data.dispatch.rfd.cumulative, 500);
}

#[tokio::test]
async fn test_oversized_admin_counts_are_field_issues() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);

    let mut data = InspectionData::default();
    data.final_inspection.visual.visual_done = 0;
    data.final_inspection.visual.ok = u64::MAX;
    data.final_inspection.visual.not_ok = 1;

    let err = h
        .handler
        .save_entry(&admin, save(june(10), Shift::A, data))
        .await
        .unwrap_err();

    match err {
        AppError::InvalidFields(errors) => {
            assert!(errors.has_issue_for("finalInspection.visual.ok"));
            assert!(errors.has_issue_for("finalInspection.visual.notOk"));
        }
        other => panic!("expected field issues, got {:?}", other),
    }
    assert!(h.records.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_inspector_counts_are_rejected() {
    let h = harness();
    let inspector = session(FINAL, UserRole::FinalInspector);

    let mut data = final_submission();
    data.final_inspection.visual.ok = u64::MAX;
    data.final_inspection.multigauge.not_ok = u64::MAX;

    let err = h
        .handler
        .save_entry(&inspector, save(june(10), Shift::A, data))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidFields(ref errors) if errors.has_issue_for("finalInspection.visual.visualDone")
            && errors.has_issue_for("finalInspection.multigauge.total")
    ));
    assert!(h.records.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_first_save_becomes_overwrite() {
    let key = RecordKey::new(june(10), LAY, Shift::A);
    let inner = Arc::new(InMemoryInspectionRecordRepository::with_records(vec![dispatch_record(
        june(10),
        LAY,
        Shift::A,
        0,
        0,
    )]));
    let winner_id = *inner.find_by_key(&key).await.unwrap().unwrap().id();

    let ai = Arc::new(FakeAi::ok());
    let handler = ServiceHandler::new(
        Arc::new(LateInsertRecordRepository::new(inner.clone())),
        Arc::new(InMemoryAppSettingsRepository::new()),
        Arc::new(InMemoryUserProfileRepository::with_profiles(staff())),
        ai.clone(),
        ai,
        "Test Report",
    );

    let outcome = handler
        .save_entry(&session(FINAL, UserRole::FinalInspector), save(june(10), Shift::A, final_submission()))
        .await
        .unwrap();

    assert!(!outcome.created);
    assert_eq!(*outcome.record.id(), winner_id);

    let records = inner.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data.final_inspection.visual.visual_done, 43);
}

#[tokio::test]
async fn test_viewer_and_pending_users_cannot_save() {
    let h = harness();

    let viewer = h
        .handler
        .save_entry(&session(VIEWER, UserRole::DataViewer), save(june(10), Shift::A, final_submission()))
        .await;
    assert!(matches!(viewer, Err(AppError::Forbidden(_))));

    let pending = mf_qi::domain::entities::Session::new(
        UserId::from(PENDING),
        UserRole::FinalInspector,
        UserStatus::PendingApproval,
    );
    let result = h.handler.list_records(&pending).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_load_entry_modes() {
    let h = harness_with(vec![dispatch_record(june(9), LAY, Shift::B, 100, 80)], FakeAi::ok());
    let inspector = session(FINAL, UserRole::FinalInspector);
    let query = |shift| LoadEntryQuery {
        date: june(10),
        part_name: LAY,
        shift,
    };

    let blank = h.handler.load_entry(&inspector, query(Shift::A)).await.unwrap();
    assert_eq!(blank.mode, EntryMode::Create);
    assert!(blank.record_id.is_none());
    assert_eq!(blank.data.dispatch.rfd.cumulative, 100);
    assert_eq!(blank.data.dispatch.dispatch.cumulative, 80);

    h.handler
        .save_entry(&inspector, save(june(10), Shift::A, final_submission()))
        .await
        .unwrap();

    let edit = h.handler.load_entry(&inspector, query(Shift::A)).await.unwrap();
    assert_eq!(edit.mode, EntryMode::Edit);
    assert!(edit.record_id.is_some());
    assert_eq!(edit.data.final_inspection.visual.ok, 40);
}

// ============================================================================
// 删除与清空
// ============================================================================

#[tokio::test]
async fn test_delete_unknown_record_is_not_found() {
    let h = harness();
    let result = h
        .handler
        .delete_record(
            &session(FINAL, UserRole::FinalInspector),
            DeleteRecordCommand {
                id: InspectionRecordId::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_clear_all_is_admin_only_and_reports_outcome() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);

    let forbidden = h
        .handler
        .clear_all_records(&session(FINAL, UserRole::FinalInspector))
        .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    let empty = h.handler.clear_all_records(&admin).await.unwrap();
    assert_eq!(empty.deleted, 0);
    assert_eq!(empty.message, "No inspection records found to delete.");

    for day in 1..=3 {
        h.handler
            .save_entry(&admin, save(june(day), Shift::A, InspectionData::default()))
            .await
            .unwrap();
    }
    let cleared = h.handler.clear_all_records(&admin).await.unwrap();
    assert_eq!(cleared.deleted, 3);
    assert_eq!(cleared.message, "All inspection records have been cleared successfully.");
    assert!(h.records.list().await.unwrap().is_empty());
}

// ============================================================================
// 用户与设置
// ============================================================================

#[tokio::test]
async fn test_sole_admin_cannot_demote_or_suspend_self() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);

    let demote = h
        .handler
        .update_user_role(
            &admin,
            UpdateUserRoleCommand {
                uid: UserId::from(ADMIN),
                role: UserRole::DataViewer,
            },
        )
        .await;
    assert!(matches!(demote, Err(AppError::FailedPrecondition(_))));

    let suspend = h
        .handler
        .update_user_status(
            &admin,
            UpdateUserStatusCommand {
                uid: UserId::from(ADMIN),
                status: UserStatus::Suspended,
            },
        )
        .await;
    assert!(matches!(suspend, Err(AppError::FailedPrecondition(_))));

    h.handler
        .update_user_role(
            &admin,
            UpdateUserRoleCommand {
                uid: UserId::from(FINAL),
                role: UserRole::Admin,
            },
        )
        .await
        .unwrap();

    let demoted = h
        .handler
        .update_user_role(
            &admin,
            UpdateUserRoleCommand {
                uid: UserId::from(ADMIN),
                role: UserRole::DataViewer,
            },
        )
        .await
        .unwrap();
    assert_eq!(demoted.role, UserRole::DataViewer);
}

#[tokio::test]
async fn test_register_profile_waits_for_approval() {
    let h = harness();
    let command = |uid: &str| RegisterProfileCommand {
        uid: UserId::from(uid),
        email: Some("new@plant.example".to_string()),
        name: " New Inspector ".to_string(),
        mobile: "9876543210".to_string(),
        requested_role: Some(UserRole::TpiInspector),
    };

    let unknown = h.handler.resolve_session(&UserId::from("new-1")).await;
    assert!(matches!(unknown, Err(AppError::Unauthenticated(_))));

    let profile = h.handler.register_profile(command("new-1")).await.unwrap();
    assert_eq!(profile.status, UserStatus::PendingApproval);
    assert_eq!(profile.role, UserRole::TpiInspector);
    assert_eq!(profile.name, "New Inspector");

    let session = h.handler.resolve_session(&UserId::from("new-1")).await.unwrap();
    assert!(session.require_active().is_err());

    let duplicate = h.handler.register_profile(command("new-1")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_bootstrap_admin_promotes_existing_profile() {
    let h = harness();

    let profile = h.handler.ensure_bootstrap_admin(UserId::from(PENDING)).await.unwrap();
    assert!(profile.is_active_admin());

    let fresh = h.handler.ensure_bootstrap_admin(UserId::from("first-admin")).await.unwrap();
    assert!(fresh.is_active_admin());
}

#[tokio::test]
async fn test_defect_vocabulary_additions() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);
    let add = |name: &str| AddDefectTypeCommand { name: name.to_string() };

    let tpi = h
        .handler
        .add_defect_type(&session(TPI, UserRole::TpiInspector), add("Crack"))
        .await;
    assert!(matches!(tpi, Err(AppError::Forbidden(_))));

    assert_eq!(h.handler.add_defect_type(&admin, add(" Crack ")).await.unwrap(), "Crack");
    let duplicate = h.handler.add_defect_type(&admin, add("crack")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let vocabulary = h.handler.defect_types(&admin).await.unwrap();
    assert_eq!(vocabulary.defects().last().map(String::as_str), Some("Crack"));
}

#[tokio::test]
async fn test_monthly_target_update_visible_to_viewers() {
    let h = harness();

    h.handler
        .set_monthly_target(
            &session(ADMIN, UserRole::Admin),
            SetMonthlyTargetCommand {
                part_name: LAY,
                target: 1_200,
            },
        )
        .await
        .unwrap();

    let targets = h.handler.monthly_targets(&session(VIEWER, UserRole::DataViewer)).await.unwrap();
    assert_eq!(targets.get(LAY), 1_200);
    assert_eq!(targets.get(PartName::InputShaft), 0);
}

#[tokio::test]
async fn test_monthly_target_above_limit_is_rejected() {
    let h = harness();
    let admin = session(ADMIN, UserRole::Admin);

    let result = h
        .handler
        .set_monthly_target(
            &admin,
            SetMonthlyTargetCommand {
                part_name: LAY,
                target: u64::MAX,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let targets = h
        .handler
        .set_monthly_target(
            &admin,
            SetMonthlyTargetCommand {
                part_name: LAY,
                target: MAX_COUNT,
            },
        )
        .await
        .unwrap();
    assert_eq!(targets.get(LAY), MAX_COUNT);
}

#[tokio::test]
async fn test_stale_admin_session_cannot_demote_sole_admin() {
    let h = harness();
    // 会话仍是管理员，但仓储里已经不是
    let stale = session(VIEWER, UserRole::Admin);

    let result = h
        .handler
        .update_user_role(
            &stale,
            UpdateUserRoleCommand {
                uid: UserId::from(ADMIN),
                role: UserRole::FinalInspector,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::FailedPrecondition(_))));

    let result = h
        .handler
        .update_user_status(
            &stale,
            UpdateUserStatusCommand {
                uid: UserId::from(ADMIN),
                status: UserStatus::PendingApproval,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::FailedPrecondition(_))));
}

// ============================================================================
// 报表与 AI
// ============================================================================

#[tokio::test]
async fn test_progress_report_text_survives_image_failure() {
    let h = harness_with(vec![dispatch_record(june(9), LAY, Shift::B, 100, 80)], FakeAi::failing_image());

    let outcome = h
        .handler
        .generate_progress_report(
            &session(VIEWER, UserRole::DataViewer),
            GenerateProgressReportCommand {
                report_date: june(10),
                shift: ReportShift::DayTotal,
                include_image: true,
            },
        )
        .await
        .unwrap();

    assert!(outcome.report.text.starts_with("Test Report - June 10th, 2024"));
    assert!(outcome.report.share_url.starts_with("whatsapp://send?text="));
    assert!(outcome.image.is_none());
    assert!(outcome.image_error.is_some());
    assert_eq!(h.ai.calls(), 1);
}

#[tokio::test]
async fn test_progress_report_without_image_skips_ai() {
    let h = harness();

    let outcome = h
        .handler
        .generate_progress_report(
            &session(VIEWER, UserRole::DataViewer),
            GenerateProgressReportCommand {
                report_date: june(10),
                shift: ReportShift::A,
                include_image: false,
            },
        )
        .await
        .unwrap();

    assert!(outcome.image.is_none());
    assert!(outcome.image_error.is_none());
    assert_eq!(h.ai.calls(), 0);
}

#[tokio::test]
async fn test_suggestion_checks_pairing_and_confidence() {
    let h = harness_with(Vec::new(), FakeAi::with_confidence(1.5));
    let viewer = session(VIEWER, UserRole::DataViewer);

    let mismatched = h
        .handler
        .suggest_status(
            &viewer,
            SuggestStatusCommand {
                part_name: LAY,
                section: AiSection::Dispatch,
                subsection: AiSubsection::TpiOk,
            },
        )
        .await;
    assert!(matches!(mismatched, Err(AppError::Validation(_))));
    assert_eq!(h.ai.calls(), 0);

    let out_of_range = h
        .handler
        .suggest_status(
            &viewer,
            SuggestStatusCommand {
                part_name: LAY,
                section: AiSection::TpiInspection,
                subsection: AiSubsection::TpiOk,
            },
        )
        .await;
    assert!(matches!(out_of_range, Err(AppError::ExternalService(_))));
}

#[tokio::test]
async fn test_tpi_report_rejects_inverted_range() {
    let h = harness();
    let result = h
        .handler
        .tpi_report(
            &session(VIEWER, UserRole::DataViewer),
            TpiReportQuery {
                part_filter: PartFilter::All,
                from: june(20),
                to: june(10),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
