//! HTTP 处理函数

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;
use zen_common::UserId;
use zen_errors::{AppError, AppResult};
use zen_telemetry::HealthStatus;

use crate::application::*;
use crate::domain::ai::StatusSuggestion;
use crate::domain::entities::{InspectionRecord, MonthlyTargets, Session, UserProfile};
use crate::domain::enums::PartName;
use crate::domain::services::{
    CumulativeSeed, DashboardMetrics, PartDailyReport, ParetoEntry, PartFilter, PendingSummary,
    TpiRangeReport,
};
use crate::domain::value_objects::InspectionRecordId;

use super::AppState;
use super::dto::*;
use super::session::{CurrentSession, UserIdHeader};

// ========== 健康检查 ==========

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let snapshot = state.feed.subscribe().borrow().clone();

    let mut status = HealthStatus::new();
    status.add_check(
        "record-snapshot",
        snapshot.is_loaded(),
        (!snapshot.is_loaded()).then(|| "initial snapshot not loaded".to_string()),
    );

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(json!({
            "status": status,
            "snapshotVersion": snapshot.version,
            "records": snapshot.len(),
        })),
    )
}

// ========== 会话与档案 ==========

pub async fn register(
    State(state): State<AppState>,
    UserIdHeader(uid): UserIdHeader,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .handler
        .register_profile(RegisterProfileCommand {
            uid,
            email: body.email,
            name: body.name,
            mobile: body.mobile,
            requested_role: body.requested_role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn current_session(CurrentSession(session): CurrentSession) -> Json<Session> {
    Json(session)
}

// ========== 检验记录 ==========

pub async fn list_records(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<Vec<InspectionRecord>>> {
    Ok(Json(state.handler.list_records(&session).await?))
}

pub async fn save_entry(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<SaveEntryRequest>,
) -> AppResult<(StatusCode, Json<SaveEntryResponse>)> {
    let outcome = state
        .handler
        .save_entry(
            &session,
            SaveEntryCommand {
                date: body.date,
                part_name: body.part_name,
                shift: body.shift,
                data: body.data,
            },
        )
        .await?;

    let code = if outcome.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        code,
        Json(SaveEntryResponse {
            record: outcome.record,
            created: outcome.created,
        }),
    ))
}

pub async fn clear_records(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ClearRecordsResponse>> {
    let outcome = state.handler.clear_all_records(&session).await?;
    Ok(Json(ClearRecordsResponse {
        deleted: outcome.deleted,
        message: outcome.message,
    }))
}

pub async fn delete_record(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> AppResult<Json<InspectionRecord>> {
    let id: InspectionRecordId = id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid record id: {}", id)))?;
    let deleted = state.handler.delete_record(&session, DeleteRecordCommand { id }).await?;
    Ok(Json(deleted))
}

pub async fn load_entry(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<RecordKeyParams>,
) -> AppResult<Json<EntryForm>> {
    let form = state
        .handler
        .load_entry(
            &session,
            LoadEntryQuery {
                date: params.date,
                part_name: params.part_name,
                shift: params.shift,
            },
        )
        .await?;
    Ok(Json(form))
}

pub async fn carry_forward(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<RecordKeyParams>,
) -> AppResult<Json<CumulativeSeed>> {
    let seed = state
        .handler
        .carry_forward(
            &session,
            CarryForwardQuery {
                date: params.date,
                part_name: params.part_name,
                shift: params.shift,
            },
        )
        .await?;
    Ok(Json(seed))
}

// ========== 看板与报表 ==========

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DashboardMetrics>> {
    let query = DashboardQuery {
        part_filter: PartFilter::from(params.part),
        reference_date: params.date.unwrap_or_else(today),
    };
    Ok(Json(state.handler.dashboard(&session, query).await?))
}

pub async fn defect_pareto(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ParetoParams>,
) -> AppResult<Json<Vec<ParetoEntry>>> {
    let query = DefectParetoQuery {
        window: params.window()?,
        today: params.today.unwrap_or_else(today),
    };
    Ok(Json(state.handler.defect_pareto(&session, query).await?))
}

pub async fn tpi_report(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<TpiReportParams>,
) -> AppResult<Json<TpiRangeReport>> {
    let query = TpiReportQuery {
        part_filter: PartFilter::from(params.part),
        from: params.from,
        to: params.to,
    };
    Ok(Json(state.handler.tpi_report(&session, query).await?))
}

pub async fn pending(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<DateParams>,
) -> AppResult<Json<Vec<PendingSummary>>> {
    let query = PendingQuery {
        date: params.date.unwrap_or_else(today),
    };
    Ok(Json(state.handler.pending(&session, query).await?))
}

pub async fn part_report(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
    Query(params): Query<PartReportParams>,
) -> AppResult<Json<PartDailyReport>> {
    let part_name = PartName::from_slug(&slug)
        .ok_or_else(|| AppError::not_found(format!("Unknown part: {}", slug)))?;
    let query = PartReportQuery {
        part_name,
        date: params.date.unwrap_or_else(today),
        shift: params.shift,
    };
    Ok(Json(state.handler.part_report(&session, query).await?))
}

pub async fn progress_report(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<ProgressReportRequest>,
) -> AppResult<Json<ProgressReportResponse>> {
    let outcome = state
        .handler
        .generate_progress_report(
            &session,
            GenerateProgressReportCommand {
                report_date: body.report_date.unwrap_or_else(today),
                shift: body.shift,
                include_image: body.include_image,
            },
        )
        .await?;
    Ok(Json(ProgressReportResponse {
        report: outcome.report,
        image: outcome.image,
        image_error: outcome.image_error,
    }))
}

// ========== 设置 ==========

pub async fn get_targets(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<MonthlyTargets>> {
    Ok(Json(state.handler.monthly_targets(&session).await?))
}

pub async fn set_target(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<SetTargetRequest>,
) -> AppResult<Json<MonthlyTargets>> {
    let targets = state
        .handler
        .set_monthly_target(
            &session,
            SetMonthlyTargetCommand {
                part_name: body.part_name,
                target: body.target,
            },
        )
        .await?;
    Ok(Json(targets))
}

pub async fn get_defect_types(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<DefectTypesResponse>> {
    let vocabulary = state.handler.defect_types(&session).await?;
    Ok(Json(DefectTypesResponse {
        defects: vocabulary.defects().to_vec(),
    }))
}

pub async fn add_defect_type(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<AddDefectTypeRequest>,
) -> AppResult<(StatusCode, Json<AddDefectTypeResponse>)> {
    let added = state
        .handler
        .add_defect_type(&session, AddDefectTypeCommand { name: body.name })
        .await?;
    Ok((StatusCode::CREATED, Json(AddDefectTypeResponse { added })))
}

// ========== 用户管理 ==========

pub async fn list_users(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<Vec<UserProfile>>> {
    Ok(Json(state.handler.list_users(&session).await?))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(uid): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .handler
        .update_user_role(
            &session,
            UpdateUserRoleCommand {
                uid: UserId::new(uid),
                role: body.role,
            },
        )
        .await?;
    Ok(Json(profile))
}

pub async fn update_user_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(uid): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .handler
        .update_user_status(
            &session,
            UpdateUserStatusCommand {
                uid: UserId::new(uid),
                status: body.status,
            },
        )
        .await?;
    Ok(Json(profile))
}

// ========== AI ==========

pub async fn suggest_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<SuggestionRequest>,
) -> AppResult<Json<StatusSuggestion>> {
    let suggestion = state
        .handler
        .suggest_status(
            &session,
            SuggestStatusCommand {
                part_name: body.part_name,
                section: body.section,
                subsection: body.subsection,
            },
        )
        .await?;
    Ok(Json(suggestion))
}
