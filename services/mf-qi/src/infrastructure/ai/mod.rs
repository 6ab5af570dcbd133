//! AI 服务适配器

mod http_client;

pub use http_client::HttpAiClient;
