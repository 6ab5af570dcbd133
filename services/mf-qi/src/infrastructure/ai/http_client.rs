//! AI flow HTTP 客户端
//!
//! 以 `{"data": input}` 调用 flow 端点，响应为 `{"result": output}`

use std::time::Instant;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zen_config::AiConfig;
use zen_errors::{AppError, AppResult};

use crate::domain::ai::{
    ReportImage, ReportImageRequest, ReportImageService, StatusSuggestion, StatusSuggestionRequest,
    StatusSuggestionService,
};
use crate::infrastructure::observability::metrics as qi_metrics;

const USER_AGENT: &str = concat!("inspectzen-mf-qi/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct FlowRequest<'a, T> {
    data: &'a T,
}

#[derive(Deserialize)]
struct FlowResponse<T> {
    result: T,
}

pub struct HttpAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    suggestion_path: String,
    image_path: String,
}

impl HttpAiClient {
    pub fn new(config: &AiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build AI http client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            suggestion_path: config.suggestion_path.clone(),
            image_path: config.image_path.clone(),
        })
    }

    async fn call_flow<I, O>(&self, flow: &str, path: &str, input: &I) -> AppResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned + Send,
    {
        let started = Instant::now();
        let result = self.post_flow(path, input).await;
        qi_metrics::record_ai_call(flow, result.is_ok(), started);

        if let Err(e) = &result {
            warn!(flow, error = %e, "AI flow call failed");
        }
        result
    }

    async fn post_flow<I, O>(&self, path: &str, input: &I) -> AppResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Calling AI flow");

        let mut request = self.http_client.post(&url).json(&FlowRequest { data: input });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("AI flow request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "AI flow returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let envelope: FlowResponse<O> = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid AI flow response: {}", e)))?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl StatusSuggestionService for HttpAiClient {
    async fn suggest(&self, request: StatusSuggestionRequest) -> AppResult<StatusSuggestion> {
        self.call_flow("suggest_inspection_status", &self.suggestion_path, &request)
            .await
    }
}

#[async_trait]
impl ReportImageService for HttpAiClient {
    async fn generate(&self, request: ReportImageRequest) -> AppResult<ReportImage> {
        self.call_flow("generate_progress_report_image", &self.image_path, &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_shape() {
        let input = serde_json::json!({ "partName": "Input shaft" });
        let value = serde_json::to_value(FlowRequest { data: &input }).unwrap();
        assert_eq!(value["data"]["partName"], "Input shaft");
    }

    #[test]
    fn test_response_envelope_shape() {
        let body = r#"{"result":{"suggestedStatus":"OK","confidenceLevel":0.8,"rationale":"stable"}}"#;
        let parsed: FlowResponse<StatusSuggestion> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.suggested_status, "OK");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AiConfig {
            base_url: "http://localhost:3400/".to_string(),
            api_key: None,
            suggestion_path: "/suggestInspectionStatusFlow".to_string(),
            image_path: "/generateProgressReportImageFlow".to_string(),
            timeout_secs: 5,
        };
        let client = HttpAiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:3400");
    }
}
