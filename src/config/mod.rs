//! Configuration file management and settings resolution.

mod manager;

pub use manager::{
    ClientResolveOptions, ClientSection, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RELAY_URL, DEFAULT_STATIC_DIR,
    ResolvedClientConfig, ResolvedServerConfig, ServerResolveOptions, ServerSection,
    SpeechSection, resolve_client_config, resolve_server_config,
};
