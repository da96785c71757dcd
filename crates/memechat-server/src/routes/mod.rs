pub mod chat;
pub mod emotions;
pub mod health;
pub mod history;

use axum::Router;

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/chat", chat::router())
        .nest("/history", history::router())
        .nest("/emotions", emotions::router())
        .nest("/health", health::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use memechat_core::{FixedRandom, InMemoryHistory, MediaCatalog, ReplyOrchestrator};

    use crate::state::AppState;

    pub fn orchestrator() -> ReplyOrchestrator {
        ReplyOrchestrator::new(Arc::new(MediaCatalog::builtin()))
            .with_random(Arc::new(FixedRandom(0)))
    }

    pub fn state_with_history() -> (AppState, Arc<InMemoryHistory>) {
        let history = Arc::new(InMemoryHistory::new(20));
        let state = AppState::new(orchestrator().with_history(history.clone()));
        (state, history)
    }

    pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
