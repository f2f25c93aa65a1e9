use anyhow::Result;
use std::sync::Arc;

use crate::config::{ConfigManager, ServerResolveOptions, resolve_server_config};
use crate::relay::{AppState, GeminiClient, serve};
use crate::status;
use crate::ui::Style;

/// Runs the relay until the process is stopped.
pub async fn run_serve(options: ServerResolveOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let config = resolve_server_config(&options, &file_config)?;

    if config.api_key.is_none() {
        tracing::warn!("no API key configured; every chat request will fail");
    } else {
        tracing::info!(model = %config.model, "API key loaded");
    }

    let address = config.address();
    status!(
        "{} {} {}",
        Style::success("Relay listening on"),
        Style::value(format!("http://{address}")),
        Style::secondary(format!("(model {})", config.model))
    );

    let model = GeminiClient::new(config.endpoint, config.model, config.api_key);
    let state = AppState::new(Arc::new(model), config.persona);

    serve(&address, state, config.static_dir).await
}
