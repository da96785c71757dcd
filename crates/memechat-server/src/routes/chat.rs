use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use memechat_schema::{ChatRequest, ChatResponse};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(body) = body?;
    let turn = state.orchestrator.respond(body.message()).await?;
    tracing::info!(emoji = %turn.symbol, meme = %turn.chosen_media_url, "chat processed");
    Ok(Json(ChatResponse::from(&turn)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use memechat_provider::{FailingProvider, ProviderError, StubProvider};
    use tower::ServiceExt;

    use super::router;
    use crate::routes::test_support::{body_json, orchestrator};
    use crate::state::AppState;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn chat_returns_answer_emoji_and_memes() {
        let provider = Arc::new(StubProvider::new("I'm so happy and delighted!"));
        let state = AppState::new(orchestrator().with_provider(provider.clone()));
        let app = router().with_state(state);

        let response = app.oneshot(post_json(r#"{"message":"hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["answer"], "I'm so happy and delighted!");
        assert_eq!(json["emoji"], "😂");
        let all = json["allMemes"].as_array().unwrap();
        assert!(all.contains(&json["meme"]));
        assert!(json["timestamp"].as_str().is_some());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn blank_message_is_400_without_provider_call() {
        let provider = Arc::new(StubProvider::new("never"));
        let state = AppState::new(orchestrator().with_provider(provider.clone()));

        for body in [
            r#"{"message":"   "}"#,
            r#"{"message":""}"#,
            r#"{"message":null}"#,
            "{}",
        ] {
            let app = router().with_state(state.clone());
            let response = app.oneshot(post_json(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Message cannot be empty");
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_body_gets_error_shape() {
        let app = router().with_state(AppState::new(orchestrator()));

        let response = app.oneshot(post_json(r#"{"message": 42"#)).await.unwrap();
        assert!(response.status().is_client_error());
        let json = body_json(response).await;
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_200() {
        let provider = Arc::new(FailingProvider::new(|| {
            ProviderError::Unavailable("connection refused".into())
        }));
        let state = AppState::new(orchestrator().with_provider(provider.clone()));
        let app = router().with_state(state);

        let response = app.oneshot(post_json(r#"{"message":"hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn strict_mode_maps_unavailable_to_503() {
        let provider = Arc::new(FailingProvider::new(|| {
            ProviderError::Unavailable("connection refused".into())
        }));
        let state = AppState::new(
            orchestrator()
                .with_provider(provider)
                .with_fallback_to_mock(false),
        );
        let app = router().with_state(state);

        let response = app.oneshot(post_json(r#"{"message":"hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Service unavailable. Please try again later.");
    }
}
