use std::sync::Arc;

use chrono::Utc;
use memechat_provider::{CompletionProvider, CompletionRequest, GeminiProvider, ProviderError};
use memechat_schema::ChatTurn;

use crate::config::MemechatConfig;
use crate::error::ChatError;
use crate::history::{HistoryStore, InMemoryHistory, NoHistory};
use crate::media::MediaCatalog;
use crate::mock::pick_mock_reply;
use crate::random::{RandomSource, ThreadRandom};
use crate::tone::classify_reply;

/// Turns one user message into a [`ChatTurn`]: reply text, tone symbol and
/// media selection.
///
/// The provider is called at most once per message. Without a provider, or
/// when the call fails and mock fallback is allowed, a canned reply is used.
pub struct ReplyOrchestrator {
    provider: Option<Arc<dyn CompletionProvider>>,
    catalog: Arc<MediaCatalog>,
    random: Arc<dyn RandomSource>,
    history: Arc<dyn HistoryStore>,
    fallback_to_mock: bool,
}

impl ReplyOrchestrator {
    pub fn new(catalog: Arc<MediaCatalog>) -> Self {
        Self {
            provider: None,
            catalog,
            random: Arc::new(ThreadRandom),
            history: Arc::new(NoHistory),
            fallback_to_mock: true,
        }
    }

    /// Wire provider, history store and fallback mode from configuration.
    pub fn from_config(config: &MemechatConfig, catalog: Arc<MediaCatalog>) -> Self {
        let mut orchestrator = Self::new(catalog)
            .with_fallback_to_mock(config.completion.fallback_to_mock);

        match config.completion.active_api_key() {
            Some(key) => {
                let provider =
                    GeminiProvider::with_config(key, config.completion.gemini.clone());
                orchestrator = orchestrator.with_provider(Arc::new(provider));
            }
            None => tracing::warn!("no completion api key configured, replies will be mocked"),
        }

        if config.history.enabled {
            orchestrator =
                orchestrator.with_history(Arc::new(InMemoryHistory::new(config.history.capacity)));
        }
        orchestrator
    }

    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = history;
        self
    }

    pub fn with_fallback_to_mock(mut self, enabled: bool) -> Self {
        self.fallback_to_mock = enabled;
        self
    }

    pub fn catalog(&self) -> &Arc<MediaCatalog> {
        &self.catalog
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn respond(&self, user_message: &str) -> Result<ChatTurn, ChatError> {
        if user_message.trim().is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let reply_text = self.reply_text(user_message).await?;
        let symbol = classify_reply(&reply_text);
        let selection = self.catalog.select(&symbol, self.random.as_ref());

        let turn = ChatTurn {
            user_text: user_message.to_string(),
            reply_text,
            symbol,
            chosen_media_url: selection.chosen,
            candidate_urls: selection.candidates,
            timestamp: Utc::now(),
        };

        tracing::debug!(symbol = %turn.symbol, meme = %turn.chosen_media_url, "reply assembled");
        self.history.record(&turn);
        Ok(turn)
    }

    async fn reply_text(&self, user_message: &str) -> Result<String, ChatError> {
        let Some(provider) = &self.provider else {
            return Ok(pick_mock_reply(self.random.as_ref()).to_string());
        };

        match provider.complete(CompletionRequest::answer(user_message)).await {
            Ok(completion) => Ok(completion.text),
            Err(err) if self.should_degrade(&err) => {
                tracing::warn!(provider = provider.name(), "completion failed, using mock reply: {err}");
                Ok(pick_mock_reply(self.random.as_ref()).to_string())
            }
            Err(err) => {
                tracing::error!(provider = provider.name(), "completion failed: {err}");
                Err(ChatError::Upstream(err))
            }
        }
    }

    fn should_degrade(&self, err: &ProviderError) -> bool {
        self.fallback_to_mock || err.is_malformed()
    }
}
