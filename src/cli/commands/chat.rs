use anyhow::Result;

use crate::chat::{ChatSession, SessionConfig};
use crate::config::{ClientResolveOptions, ConfigManager, resolve_client_config};

pub async fn run_chat(options: ClientResolveOptions) -> Result<()> {
    let config = load_session_config(&options)?;
    tracing::debug!(
        endpoint = %config.endpoint,
        translate_to = ?config.translate_to,
        "starting chat"
    );

    let session = ChatSession::new(config);
    session.run().await
}

fn load_session_config(options: &ClientResolveOptions) -> Result<SessionConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let resolved = resolve_client_config(options, &file_config)?;

    Ok(SessionConfig::new(
        resolved.endpoint,
        resolved.translate_to,
        resolved.speech,
    ))
}
