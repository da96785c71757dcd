use std::path::PathBuf;
use std::sync::Arc;

use chrono::TimeDelta;
use memechat_core::{default_session_gap, MediaCatalog, MemechatConfig, ReplyOrchestrator};

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReplyOrchestrator>,
    /// Inactivity gap used by `/api/history/sessions`.
    pub session_gap: TimeDelta,
    /// Directory served for non-API paths (contains index.html)
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(orchestrator: ReplyOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            session_gap: default_session_gap(),
            static_dir: PathBuf::from("public"),
        }
    }

    pub fn from_config(config: &MemechatConfig, catalog: MediaCatalog) -> Self {
        let orchestrator = ReplyOrchestrator::from_config(config, Arc::new(catalog));
        Self {
            orchestrator: Arc::new(orchestrator),
            session_gap: config
                .history
                .session_gap()
                .unwrap_or_else(default_session_gap),
            static_dir: config.server.static_dir.clone(),
        }
    }

    pub fn catalog(&self) -> &MediaCatalog {
        self.orchestrator.catalog()
    }
}
