use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::{CommentsmithError, Result};
use super::backend::{CommentBackend, CommentRequest};

/// Factory function to create the comment backend described by config
pub fn create_backend(config: &BackendConfig) -> Result<Box<dyn CommentBackend>> {
    if !config.enabled {
        return Err(CommentsmithError::Config("Comment backend is disabled".to_string()));
    }

    Ok(Box::new(HttpCommentBackend::new(config)?))
}

#[derive(Debug, Deserialize)]
struct PromptReply {
    comment: String,
}

/// Comment service reached over HTTP: `POST {base_url}/prompt` with a JSON body
pub struct HttpCommentBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpCommentBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(CommentsmithError::Config(
                "Base URL required for the comment backend".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/prompt", base_url),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommentBackend for HttpCommentBackend {
    async fn generate_comment(&self, request: &CommentRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| CommentsmithError::Backend(format!("Request to {} failed: {}", self.endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CommentsmithError::Backend(format!(
                "Comment service error {}: {}",
                status, error_text
            )));
        }

        let reply: PromptReply = response
            .json()
            .await
            .map_err(|e| CommentsmithError::Backend(format!("Failed to parse comment service response: {}", e)))?;

        Ok(reply.comment)
    }

    fn backend_name(&self) -> &str {
        "HTTP comment service"
    }
}
