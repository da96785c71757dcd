use axum::{extract::State, routing::get, Json, Router};
use memechat_core::{conversation_sessions, ConversationSession};
use memechat_schema::HistoryRecord;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_history))
        .route("/sessions", get(list_sessions))
}

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryRecord>> {
    Json(state.orchestrator.history().list())
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<ConversationSession>> {
    let history = state.orchestrator.history().list();
    Json(conversation_sessions(history, state.session_gap))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeDelta, Utc};
    use memechat_core::HistoryStore;
    use memechat_schema::{ChatTurn, ToneSymbol};
    use tower::ServiceExt;

    use super::router;
    use crate::routes::test_support::{body_json, orchestrator, state_with_history};
    use crate::state::AppState;

    fn turn(message: &str, minutes_ago: i64) -> ChatTurn {
        ChatTurn {
            user_text: message.to_string(),
            reply_text: format!("reply to {message}"),
            symbol: ToneSymbol::new("😂"),
            chosen_media_url: "laugh.jpeg".into(),
            candidate_urls: vec!["laugh.jpeg".into()],
            timestamp: Utc::now() - TimeDelta::minutes(minutes_ago),
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn history_is_empty_without_store() {
        let app = router().with_state(AppState::new(orchestrator()));

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn history_lists_recorded_turns() {
        let (state, history) = state_with_history();
        history.record(&turn("hello", 1));
        let app = router().with_state(state);

        let json = body_json(app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(json[0]["message"], "hello");
        assert_eq!(json[0]["ai_reply"], "reply to hello");
        assert_eq!(json[0]["meme_url"], "laugh.jpeg");
        assert_eq!(json[0]["all_memes"][0], "laugh.jpeg");
    }

    #[tokio::test]
    async fn sessions_split_on_inactivity_gap() {
        let (state, history) = state_with_history();
        history.record(&turn("morning chat about a very long topic", 60));
        history.record(&turn("follow up", 58));
        history.record(&turn("later", 1));
        let app = router().with_state(state);

        let json = body_json(app.oneshot(get("/sessions")).await.unwrap()).await;
        let sessions = json.as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["title"], "morning chat about a very...");
        assert_eq!(sessions[0]["turns"].as_array().unwrap().len(), 2);
        assert_eq!(sessions[1]["title"], "later");
    }
}
