//! zen-config - 配置加载库
//!
//! 加载顺序：`{dir}/default.toml` → `{dir}/{APP_ENV}.toml` → `APP_` 前缀环境变量
//! （嵌套字段用 `__` 分隔，如 `APP_SERVER__PORT=8080`）

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    // 开发环境: 5, 生产环境: 20
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 20,
        _ => 5,
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// AI 服务配置（状态建议 + 报告图片）
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_suggestion_path")]
    pub suggestion_path: String,
    #[serde(default = "default_image_path")]
    pub image_path: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_suggestion_path() -> String {
    "/suggestInspectionStatusFlow".to_string()
}

fn default_image_path() -> String {
    "/generateProgressReportImageFlow".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    60
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 检验业务配置
#[derive(Debug, Clone, Deserialize)]
pub struct InspectionConfig {
    /// 等待首个记录快照的最长时间
    #[serde(default = "default_initial_load_timeout_ms")]
    pub initial_load_timeout_ms: u64,
    /// 进度报告标题
    #[serde(default = "default_report_title")]
    pub report_title: String,
    /// 启动时确保该用户为激活管理员
    #[serde(default)]
    pub bootstrap_admin_uid: Option<String>,
}

fn default_initial_load_timeout_ms() -> u64 {
    7000
}

fn default_report_title() -> String {
    "InspectZen Inspection Report".to_string()
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            initial_load_timeout_ms: default_initial_load_timeout_ms(),
            report_title: default_report_title(),
            bootstrap_admin_uid: None,
        }
    }
}

impl InspectionConfig {
    pub fn initial_load_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_load_timeout_ms)
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub database: Option<DatabaseConfig>,
    pub ai: AiConfig,
    #[serde(default)]
    pub inspection: InspectionConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("APP_").split("__"));

        Self::from_figment(figment)
    }

    /// 从已组装好的 Figment 提取配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
