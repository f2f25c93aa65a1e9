use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fs::atomic_write;
use crate::paths;
use crate::relay::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PERSONA, DEFAULT_TEMPERATURE, Persona};
use crate::speech::SpeechSettings;
use crate::translation::{DEFAULT_TRANSLATION_LANGUAGE, validate_language};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Relay settings in the `[server]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Generative model name, e.g. `gemini-2.5-flash`.
    pub model: Option<String>,
    /// Base URL of the generative model API.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
    /// System instruction sent with every conversation.
    pub persona: Option<String>,
    pub temperature: Option<f32>,
    /// Directory served for every path other than `/api/chat`.
    pub static_dir: Option<PathBuf>,
}

impl ServerSection {
    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        let env_var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        if let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone().filter(|key| !key.is_empty())
    }
}

/// Chat client defaults in the `[client]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Base URL of the relay.
    pub endpoint: Option<String>,
    /// Language replies are translated into. Empty disables translation.
    pub translate_to: Option<String>,
}

/// Speech settings in the `[speech]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechSection {
    pub enabled: Option<bool>,
    /// espeak-ng compatible synthesizer program.
    pub program: Option<String>,
    /// Voice names tried in order when picking a voice.
    pub voices: Option<Vec<String>>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    /// Recognition locale.
    pub language: Option<String>,
    /// Command capturing one spoken utterance and printing its transcript.
    pub recognizer: Option<Vec<String>>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/tutor/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub speech: SpeechSection,
}

/// CLI overrides for `tutor serve`.
#[derive(Debug, Clone, Default)]
pub struct ServerResolveOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub static_dir: Option<PathBuf>,
}

/// Relay configuration after merging CLI, environment and config file.
#[derive(Debug, Clone)]
pub struct ResolvedServerConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub persona: Persona,
    pub static_dir: PathBuf,
}

impl ResolvedServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CLI overrides for `tutor chat`.
#[derive(Debug, Clone, Default)]
pub struct ClientResolveOptions {
    pub endpoint: Option<String>,
    pub to: Option<String>,
    pub no_translate: bool,
    pub mute: bool,
}

/// Chat client configuration after merging CLI and config file.
#[derive(Debug, Clone)]
pub struct ResolvedClientConfig {
    pub endpoint: String,
    pub translate_to: Option<String>,
    pub speech: SpeechSettings,
}

fn env_port() -> Result<Option<u16>> {
    match std::env::var("PORT") {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid PORT environment variable: '{value}'")),
        _ => Ok(None),
    }
}

/// Resolves relay settings.
///
/// Priority: CLI option, then `PORT` / API key environment variables, then the
/// config file, then built-in defaults. A missing API key is not an error.
///
/// # Errors
///
/// Returns an error if `PORT` is not a valid port number or the temperature is
/// out of range.
pub fn resolve_server_config(
    options: &ServerResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedServerConfig> {
    let server = &config_file.server;

    let port = match options.port {
        Some(port) => port,
        None => env_port()?.or(server.port).unwrap_or(DEFAULT_PORT),
    };

    let temperature = server.temperature.unwrap_or(DEFAULT_TEMPERATURE);
    if !(0.0..=2.0).contains(&temperature) {
        bail!("Invalid temperature {temperature}: expected a value between 0.0 and 2.0");
    }

    Ok(ResolvedServerConfig {
        host: options
            .host
            .clone()
            .or_else(|| server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
        model: options
            .model
            .clone()
            .or_else(|| server.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        endpoint: server
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        api_key: server.get_api_key(),
        persona: Persona {
            instruction: server
                .persona
                .clone()
                .unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            temperature,
        },
        static_dir: options
            .static_dir
            .clone()
            .or_else(|| server.static_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
    })
}

/// Resolves chat client settings.
///
/// # Errors
///
/// Returns an error if the translation language is not a supported code.
pub fn resolve_client_config(
    options: &ClientResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedClientConfig> {
    let endpoint = options
        .endpoint
        .clone()
        .or_else(|| config_file.client.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());

    let translate_to = if options.no_translate {
        None
    } else {
        let code = options
            .to
            .as_deref()
            .or(config_file.client.translate_to.as_deref())
            .unwrap_or(DEFAULT_TRANSLATION_LANGUAGE)
            .trim();
        if code.is_empty() {
            None
        } else {
            validate_language(code)?;
            Some(code.to_string())
        }
    };

    Ok(ResolvedClientConfig {
        endpoint,
        translate_to,
        speech: resolve_speech(&config_file.speech, options.mute),
    })
}

fn resolve_speech(section: &SpeechSection, mute: bool) -> SpeechSettings {
    let defaults = SpeechSettings::default();
    SpeechSettings {
        enabled: !mute && section.enabled.unwrap_or(defaults.enabled),
        program: section.program.clone().unwrap_or(defaults.program),
        preferred_voices: section.voices.clone().unwrap_or(defaults.preferred_voices),
        rate: section.rate.unwrap_or(defaults.rate),
        pitch: section.pitch.unwrap_or(defaults.pitch),
        language: section.language.clone().unwrap_or(defaults.language),
        recognizer: section.recognizer.clone().unwrap_or(defaults.recognizer),
    }
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/tutor/config.toml`
    /// or `~/.config/tutor/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = ConfigFile {
            server: ServerSection {
                port: Some(8080),
                model: Some("gemini-2.0-flash".to_string()),
                ..ServerSection::default()
            },
            client: ClientSection {
                endpoint: Some("http://tutor.local".to_string()),
                translate_to: Some("ja".to_string()),
            },
            speech: SpeechSection {
                enabled: Some(false),
                recognizer: Some(vec!["stt".to_string(), "--once".to_string()]),
                ..SpeechSection::default()
            },
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default().unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[server\nport = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_partial_file_parses() {
        let config: ConfigFile = toml::from_str("[client]\ntranslate_to = \"\"\n").unwrap();
        assert_eq!(config.client.translate_to.as_deref(), Some(""));
        assert_eq!(config.server, ServerSection::default());
    }

    #[test]
    #[serial]
    fn test_server_api_key_from_env() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("TUTOR_TEST_API_KEY", "env-key");
        }

        let server = ServerSection {
            api_key: Some("file-key".to_string()),
            api_key_env: Some("TUTOR_TEST_API_KEY".to_string()),
            ..ServerSection::default()
        };
        assert_eq!(server.get_api_key(), Some("env-key".to_string()));

        // SAFETY: cleanup of the test variable
        unsafe {
            std::env::remove_var("TUTOR_TEST_API_KEY");
        }
        assert_eq!(server.get_api_key(), Some("file-key".to_string()));
    }

    #[test]
    #[serial]
    fn test_server_without_api_key() {
        let server = ServerSection {
            api_key_env: Some("TUTOR_TEST_NONEXISTENT_KEY".to_string()),
            ..ServerSection::default()
        };
        assert_eq!(server.get_api_key(), None);
    }

    #[test]
    #[serial]
    fn test_resolve_server_defaults() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::remove_var("PORT");
        }
        let config = ConfigFile {
            server: ServerSection {
                api_key_env: Some("TUTOR_TEST_NONEXISTENT_KEY".to_string()),
                ..ServerSection::default()
            },
            ..ConfigFile::default()
        };

        let resolved = resolve_server_config(&ServerResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.address(), "0.0.0.0:3000");
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.persona, Persona::default());
        assert_eq!(resolved.static_dir, PathBuf::from("public"));
        assert!(resolved.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_server_port_priority() {
        let config = ConfigFile {
            server: ServerSection {
                port: Some(4000),
                ..ServerSection::default()
            },
            ..ConfigFile::default()
        };
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("PORT", "5000");
        }

        let from_env = resolve_server_config(&ServerResolveOptions::default(), &config).unwrap();
        let from_cli = resolve_server_config(
            &ServerResolveOptions {
                port: Some(6000),
                ..ServerResolveOptions::default()
            },
            &config,
        )
        .unwrap();

        // SAFETY: cleanup
        unsafe {
            std::env::remove_var("PORT");
        }
        let from_file = resolve_server_config(&ServerResolveOptions::default(), &config).unwrap();

        assert_eq!(from_env.port, 5000);
        assert_eq!(from_cli.port, 6000);
        assert_eq!(from_file.port, 4000);
    }

    #[test]
    #[serial]
    fn test_resolve_server_invalid_port_env() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("PORT", "http");
        }
        let result =
            resolve_server_config(&ServerResolveOptions::default(), &ConfigFile::default());
        // SAFETY: cleanup
        unsafe {
            std::env::remove_var("PORT");
        }

        assert!(result.unwrap_err().to_string().contains("PORT"));
    }

    #[test]
    #[serial]
    fn test_resolve_server_rejects_bad_temperature() {
        let config = ConfigFile {
            server: ServerSection {
                temperature: Some(3.5),
                ..ServerSection::default()
            },
            ..ConfigFile::default()
        };
        let result = resolve_server_config(&ServerResolveOptions::default(), &config);
        assert!(result.unwrap_err().to_string().contains("temperature"));
    }

    #[test]
    fn test_resolve_client_defaults() {
        let resolved =
            resolve_client_config(&ClientResolveOptions::default(), &ConfigFile::default())
                .unwrap();

        assert_eq!(resolved.endpoint, "http://localhost:3000");
        assert_eq!(resolved.translate_to.as_deref(), Some("id"));
        assert_eq!(resolved.speech, SpeechSettings::default());
    }

    #[test]
    fn test_resolve_client_translation_switches() {
        let mut config = ConfigFile::default();
        config.client.translate_to = Some(String::new());
        let resolved = resolve_client_config(&ClientResolveOptions::default(), &config).unwrap();
        assert!(resolved.translate_to.is_none());

        let options = ClientResolveOptions {
            to: Some("ko".to_string()),
            ..ClientResolveOptions::default()
        };
        let resolved = resolve_client_config(&options, &config).unwrap();
        assert_eq!(resolved.translate_to.as_deref(), Some("ko"));

        let options = ClientResolveOptions {
            to: Some("ko".to_string()),
            no_translate: true,
            ..ClientResolveOptions::default()
        };
        let resolved = resolve_client_config(&options, &config).unwrap();
        assert!(resolved.translate_to.is_none());
    }

    #[test]
    fn test_resolve_client_rejects_unknown_language() {
        let options = ClientResolveOptions {
            to: Some("klingon".to_string()),
            ..ClientResolveOptions::default()
        };
        let err = resolve_client_config(&options, &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_resolve_client_speech() {
        let config = ConfigFile {
            speech: SpeechSection {
                program: Some("espeak".to_string()),
                rate: Some(1.2),
                recognizer: Some(vec!["stt".to_string()]),
                ..SpeechSection::default()
            },
            ..ConfigFile::default()
        };

        let resolved = resolve_client_config(&ClientResolveOptions::default(), &config).unwrap();
        assert!(resolved.speech.enabled);
        assert_eq!(resolved.speech.program, "espeak");
        assert!((resolved.speech.rate - 1.2).abs() < f32::EPSILON);
        assert_eq!(resolved.speech.recognizer, vec!["stt"]);

        let muted = ClientResolveOptions {
            mute: true,
            ..ClientResolveOptions::default()
        };
        let resolved = resolve_client_config(&muted, &config).unwrap();
        assert!(!resolved.speech.enabled);
    }
}
