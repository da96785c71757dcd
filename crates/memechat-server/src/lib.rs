pub mod error;
pub mod routes;
pub mod state;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Unknown paths get the frontend's index.html.
    let index = state.static_dir.join("index.html");
    let frontend = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .nest("/api", routes::api_router())
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let has_provider = state.orchestrator.has_provider();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("memechat-server listening on {}", addr);
    if has_provider {
        tracing::info!("using gemini for chat replies");
    } else {
        tracing::info!("no api key found, using mock replies");
    }
    axum::serve(listener, app).await?;
    Ok(())
}
