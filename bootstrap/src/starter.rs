//! 服务启动器
//!
//! 所有 HTTP 服务共用的启动流程

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use zen_config::AppConfig;
use zen_errors::AppResult;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, load_dotenv, shutdown_signal};

/// 请求体上限（报告图片请求体较大）
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// 运行 HTTP 服务
///
/// 1. 加载 `.env` 与配置
/// 2. 初始化日志
/// 3. 创建基础设施（数据库连接池、metrics 记录器）
/// 4. 调用 `router_builder` 构建业务路由
/// 5. 挂载 `/metrics`、追踪与 CORS 中间件并启动，收到信号后优雅关闭
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     zen_bootstrap::run_http("config", |infra| async move {
///         Ok(build_router(infra))
///     })
///     .await
/// }
/// ```
pub async fn run_http<F, Fut>(config_dir: &str, router_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    load_dotenv();
    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let addr = server_addr(&config)?;
    let infra = Infrastructure::from_config(config).await?;
    let metrics = infra.metrics_handle();

    let mut app = router_builder(infra).await?;
    if let Some(handle) = metrics {
        app = app.route("/metrics", get(move || async move { handle.render() }));
    }

    let app = app
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}

/// 解析监听地址
pub fn server_addr(config: &AppConfig) -> Result<SocketAddr, std::net::AddrParseError> {
    format!("{}:{}", config.server.host, config.server.port).parse()
}
