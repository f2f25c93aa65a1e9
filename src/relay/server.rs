//! HTTP surface of the relay: `POST /api/chat` plus static assets.

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::error::RelayError;
use super::model::{GenerativeModel, relay};
use super::prompt::Persona;
use crate::conversation::{ChatResult, Turn};

/// State shared by the relay handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn GenerativeModel>,
    pub persona: Arc<Persona>,
}

impl AppState {
    pub fn new(model: Arc<dyn GenerativeModel>, persona: Persona) -> Self {
        Self {
            model,
            persona: Arc::new(persona),
        }
    }
}

/// Builds the relay router. Paths other than `/api/chat` are served from `static_dir`.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the relay until the process is stopped.
pub async fn serve(addr: &str, state: AppState, static_dir: PathBuf) -> anyhow::Result<()> {
    use anyhow::Context;

    if !static_dir.is_dir() {
        tracing::warn!(dir = %static_dir.display(), "static asset directory does not exist");
    }

    let router = create_router(state, &static_dir);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(address = %addr, static_dir = %static_dir.display(), "relay listening");

    axum::serve(listener, router)
        .await
        .context("Relay server error")?;

    Ok(())
}

async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResult>, RelayError> {
    let conversation = parse_conversation(&body)?;

    tracing::debug!(turns = conversation.len(), "relaying conversation");

    let result = relay(state.model.as_ref(), &state.persona, &conversation)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "model call failed"))?;

    Ok(Json(ChatResult { result }))
}

/// Extracts the `conversation` array from a raw request body.
fn parse_conversation(body: &[u8]) -> Result<Vec<Turn>, RelayError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::InvalidInput(format!("Request body is not valid JSON: {e}")))?;

    let Some(items) = value.get("conversation").and_then(Value::as_array) else {
        return Err(RelayError::InvalidInput(
            "Conversation must be an array".to_string(),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Turn::deserialize(item).map_err(|e| {
                RelayError::InvalidInput(format!("Invalid conversation turn at index {index}: {e}"))
            })
        })
        .collect()
}
