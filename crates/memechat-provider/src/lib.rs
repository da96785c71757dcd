pub mod gemini;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Opaque text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Single bounded attempt; callers decide whether to degrade on error.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Wraps a raw user message in the question-answering prompt.
    pub fn answer(message: &str) -> Self {
        Self::new(format!(
            "Answer the following question in a helpful and detailed way: \"{message}\""
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection refused, DNS failure or timeout.
    #[error("completion service unavailable: {0}")]
    Unavailable(String),
    #[error("completion service rate limited: {0}")]
    RateLimited(String),
    #[error("completion service error ({status}): {message}")]
    Status { status: u16, message: String },
    /// 2xx response whose body does not carry generated text.
    #[error("unexpected response format from completion service: {0}")]
    Malformed(String),
    #[error("completion request failed: {0}")]
    Request(String),
}

impl ProviderError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProviderError::Malformed(_))
    }

    /// HTTP status a server should answer with when this error is surfaced.
    pub fn http_status(&self) -> u16 {
        match self {
            ProviderError::Unavailable(_) => 503,
            ProviderError::RateLimited(_) => 429,
            ProviderError::Status { status, .. } => *status,
            ProviderError::Malformed(_) | ProviderError::Request(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ProviderError::Unavailable(e.to_string())
        } else if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

// ============================================================
// Stub provider
// ============================================================

/// Provider returning a fixed reply; counts how often it was asked.
#[derive(Debug, Default)]
pub struct StubProvider {
    reply: String,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Completion {
            text: self.reply.clone(),
        })
    }
}

/// Provider that always fails with the error built by `make_error`.
pub struct FailingProvider {
    make_error: Box<dyn Fn() -> ProviderError + Send + Sync>,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(make_error: impl Fn() -> ProviderError + Send + Sync + 'static) -> Self {
        Self {
            make_error: Box::new(make_error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}
