//! 基础设施资源管理

use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use zen_config::{AppConfig, DatabaseConfig};
use zen_errors::{AppError, AppResult};
use zen_telemetry::init_metrics;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INITIAL_DELAY_MS: u64 = 500;
const CONNECT_MAX_DELAY_MS: u64 = 8_000;

/// 基础设施资源容器
///
/// 未配置数据库时 `postgres_pool` 为空，服务使用内存存储
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: Option<PgPool>,
    metrics: Option<PrometheusHandle>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let postgres_pool = match &config.database {
            Some(database) => Some(connect_postgres(database).await?),
            None => {
                info!("No database configured, records are kept in memory");
                None
            }
        };

        let metrics = match init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        };

        Ok(Self {
            config,
            postgres_pool,
            metrics,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> Option<PgPool> {
        self.postgres_pool.clone()
    }

    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics.clone()
    }
}

/// 建立 PostgreSQL 连接池，启动阶段按指数退避重试
async fn connect_postgres(database: &DatabaseConfig) -> AppResult<PgPool> {
    let mut delay = Duration::from_millis(CONNECT_INITIAL_DELAY_MS);

    for attempt in 1..=CONNECT_ATTEMPTS {
        let result = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .connect(database.url.expose_secret())
            .await;

        match result {
            Ok(pool) => {
                info!(
                    attempt,
                    max_connections = database.max_connections,
                    "PostgreSQL connection pool created"
                );
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(
                    attempt,
                    max_attempts = CONNECT_ATTEMPTS,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "PostgreSQL connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(Duration::from_millis(CONNECT_MAX_DELAY_MS));
            }
            Err(e) => {
                return Err(AppError::database(format!(
                    "Failed to connect to PostgreSQL after {} attempts: {}",
                    CONNECT_ATTEMPTS, e
                )));
            }
        }
    }

    Err(AppError::internal("PostgreSQL connection was never attempted"))
}
