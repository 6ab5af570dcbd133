//! mf-qi Service - InspectZen

use std::sync::Arc;

use tracing::{info, warn};
use zen_bootstrap::{Infrastructure, run_http};
use zen_common::UserId;
use zen_ports::{SnapshotFeed, wait_initial_snapshot};

use mf_qi::api::{self, AppState};
use mf_qi::application::ServiceHandler;
use mf_qi::domain::repositories::{
    AppSettingsRepository, InspectionRecordRepository, UserProfileRepository,
};
use mf_qi::infrastructure::ai::HttpAiClient;
use mf_qi::infrastructure::persistence::{
    InMemoryAppSettingsRepository, InMemoryInspectionRecordRepository, InMemoryUserProfileRepository,
    LiveRecordStore, PostgresAppSettingsRepository, PostgresInspectionRecordRepository,
    PostgresUserProfileRepository, ensure_schema,
};

type Repositories = (
    Arc<dyn InspectionRecordRepository>,
    Arc<dyn AppSettingsRepository>,
    Arc<dyn UserProfileRepository>,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_http("config", |infra: Infrastructure| async move {
        info!("Initializing mf-qi Service...");
        let config = infra.config().clone();

        let (record_repo, settings_repo, profile_repo): Repositories = match infra.postgres_pool() {
            Some(pool) => {
                ensure_schema(&pool).await?;
                (
                    Arc::new(PostgresInspectionRecordRepository::new(pool.clone())),
                    Arc::new(PostgresAppSettingsRepository::new(pool.clone())),
                    Arc::new(PostgresUserProfileRepository::new(pool)),
                )
            }
            None => (
                Arc::new(InMemoryInspectionRecordRepository::new()),
                Arc::new(InMemoryAppSettingsRepository::new()),
                Arc::new(InMemoryUserProfileRepository::new()),
            ),
        };
        info!("Repositories initialized");

        let live_store = Arc::new(LiveRecordStore::new(record_repo));
        let loader = Arc::clone(&live_store);
        tokio::spawn(async move {
            if let Err(e) = loader.refresh().await {
                warn!(error = %e, "Initial record snapshot load failed");
            }
        });

        let initial = wait_initial_snapshot(
            live_store.subscribe(),
            config.inspection.initial_load_timeout(),
        )
        .await;
        info!(
            records = initial.snapshot.len(),
            timed_out = initial.timed_out,
            "Record snapshot ready"
        );

        let ai_client = Arc::new(HttpAiClient::new(&config.ai)?);
        let handler = Arc::new(ServiceHandler::new(
            live_store.clone(),
            settings_repo,
            profile_repo,
            ai_client.clone(),
            ai_client,
            config.inspection.report_title.clone(),
        ));

        if let Some(uid) = &config.inspection.bootstrap_admin_uid {
            handler.ensure_bootstrap_admin(UserId::new(uid.clone())).await?;
        }

        Ok(api::router(AppState::new(handler, live_store)))
    })
    .await
}
