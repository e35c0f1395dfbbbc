// OpenAI-compatible API client
// Author: kelexine (https://github.com/kelexine)

use super::streaming;
use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use crate::generation::{ChatRequest, ImageRequest, Provider, TokenStream};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Client for an OpenAI-compatible text/image generation API.
///
/// Handles authentication and request shaping for:
/// - Streaming chat completions (SSE)
/// - Image generation
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with an HTTP connection pool tuned for
    /// long-running streaming responses.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        // Configure HTTP client for optimal streaming performance
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client with connection pooling and keep-alive");

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            #[serde(rename = "type")]
            error_type: Option<String>,
        }

        let error_resp: ErrorResponse = serde_json::from_str(response_text).ok()?;
        let error = error_resp.error?;

        // Keep the provider's type name in the text: classification matches
        // on it downstream.
        match (error.error_type, error.message) {
            (Some(error_type), Some(message)) => Some(format!("{}: {}", error_type, message)),
            (Some(error_type), None) => Some(error_type),
            (None, Some(message)) => Some(message),
            (None, None) => None,
        }
    }

    async fn rejection(endpoint: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        let message =
            Self::extract_error_message(&error_text).unwrap_or_else(|| error_text.clone());
        error!(%status, endpoint, "provider request rejected: {}", message);
        AppError::Provider(format!("HTTP {}: {}", status, message))
    }
}

#[async_trait]
impl Provider for OpenAiClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TokenStream> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, "opening chat completion stream");

        let body = json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "stream": true,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection("chat", response).await);
        }

        Ok(streaming::parse_sse_stream(response.bytes_stream()))
    }

    async fn create_image(&self, request: ImageRequest) -> Result<String> {
        #[derive(Deserialize)]
        struct ImagesResponse {
            #[serde(default)]
            data: Vec<GeneratedImage>,
        }

        #[derive(Deserialize)]
        struct GeneratedImage {
            url: Option<String>,
        }

        let url = format!("{}/images/generations", self.base_url);
        debug!(model = %request.model, size = %request.size, "requesting image generation");

        let body = json!({
            "model": request.model,
            "prompt": request.prompt,
            "n": 1,
            "size": request.size,
            "quality": request.quality,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection("image", response).await);
        }

        let payload: ImagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Response parsing error: {}", e)))?;

        payload
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| AppError::Provider("image response contained no URL".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_with_type_and_message() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"rate_limit_error"}}"#;
        assert_eq!(
            OpenAiClient::extract_error_message(body),
            Some("rate_limit_error: Rate limit reached".to_string())
        );
    }

    #[test]
    fn test_extract_error_message_non_json() {
        assert_eq!(OpenAiClient::extract_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ProviderConfig {
            api_base_url: "http://localhost:1234/v1/".to_string(),
            ..Default::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/v1");
    }
}
