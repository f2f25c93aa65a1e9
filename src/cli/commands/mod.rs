//! Subcommand implementations.

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Relay server command handler.
pub mod serve;

/// Voice listing command handler.
pub mod voices;
