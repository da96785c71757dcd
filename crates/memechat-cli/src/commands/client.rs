//! HTTP client for a running memechat server.

use std::time::Duration;

use memechat_schema::{ChatRequest, ChatResponse, ErrorBody, HistoryRecord};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached at all.
    #[error("Could not reach the memechat server at {url}. Is it running?")]
    Connectivity { url: String },
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Other(String),
}

impl ClientError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Connectivity { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let request = ChatRequest::new(message);
        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.decode(resp).await
    }

    pub async fn history(&self) -> Result<Vec<HistoryRecord>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/history", self.base_url))
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.decode(resp).await
    }

    async fn decode<T>(&self, resp: reqwest::Response) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("server returned {status}"));
            return Err(ClientError::Server { status, message });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Other(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_connect() || err.is_timeout() {
            ClientError::Connectivity {
                url: self.base_url.clone(),
            }
        } else {
            ClientError::Other(err.to_string())
        }
    }
}
