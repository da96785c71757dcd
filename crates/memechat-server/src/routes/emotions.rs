use axum::{extract::State, routing::get, Json, Router};
use memechat_schema::EmotionCatalog;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_emotions))
}

pub async fn list_emotions(State(state): State<AppState>) -> Json<EmotionCatalog> {
    Json(state.catalog().emotion_catalog())
}
