//! HTTP API

pub mod dto;
pub mod handlers;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use zen_ports::SnapshotFeed;

use crate::application::ServiceHandler;
use crate::domain::entities::InspectionRecord;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ServiceHandler>,
    pub feed: Arc<dyn SnapshotFeed<InspectionRecord>>,
}

impl AppState {
    pub fn new(handler: Arc<ServiceHandler>, feed: Arc<dyn SnapshotFeed<InspectionRecord>>) -> Self {
        Self { handler, feed }
    }
}

/// 构建业务路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(handlers::register))
        .route("/api/session", get(handlers::current_session))
        .route(
            "/api/records",
            get(handlers::list_records)
                .put(handlers::save_entry)
                .delete(handlers::clear_records),
        )
        .route("/api/records/entry", get(handlers::load_entry))
        .route("/api/records/carry-forward", get(handlers::carry_forward))
        .route("/api/records/{id}", delete(handlers::delete_record))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/pareto/defects", get(handlers::defect_pareto))
        .route("/api/reports/tpi", get(handlers::tpi_report))
        .route("/api/reports/pending", get(handlers::pending))
        .route("/api/reports/part/{slug}", get(handlers::part_report))
        .route("/api/reports/progress", post(handlers::progress_report))
        .route("/api/targets", get(handlers::get_targets).put(handlers::set_target))
        .route(
            "/api/defect-types",
            get(handlers::get_defect_types).post(handlers::add_defect_type),
        )
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{uid}/role", put(handlers::update_user_role))
        .route("/api/users/{uid}/status", put(handlers::update_user_status))
        .route("/api/ai/suggestion", post(handlers::suggest_status))
        .with_state(state)
}
