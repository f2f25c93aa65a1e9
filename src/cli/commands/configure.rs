//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Confirm, Select, Text};

use crate::config::{ConfigFile, ConfigManager, DEFAULT_RELAY_URL};
use crate::relay::DEFAULT_MODEL;
use crate::translation::{DEFAULT_TRANSLATION_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::ui::{Style, handle_prompt_cancellation};

const NO_TRANSLATION: &str = "(none) - Do not translate replies";

/// Runs the configure command.
///
/// With `show`, prints the effective config file. Otherwise asks for the relay
/// URL, translation language, speech and model defaults.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        return show_config();
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn show_config() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    println!(
        "{} {}",
        Style::header("Config file"),
        Style::secondary(manager.config_path().display())
    );
    println!();
    print_current_defaults(&config);
    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let endpoint = prompt_endpoint(config.client.endpoint.as_deref())?;
    let translate_to = select_translation_language(config.client.translate_to.as_deref())?;
    let speak = Confirm::new("Speak tutor replies aloud?")
        .with_default(config.speech.enabled.unwrap_or(true))
        .prompt()?;
    let model = prompt_model(config.server.model.as_deref())?;

    config.client.endpoint = Some(endpoint);
    config.client.translate_to = Some(translate_to);
    config.speech.enabled = Some(speak);
    config.server.model = Some(model);

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn not_set() -> String {
    Style::secondary("(not set)")
}

fn print_current_defaults(config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        config
            .client
            .endpoint
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("translate"),
        match config.client.translate_to.as_deref() {
            None => not_set(),
            Some("") => Style::value("off"),
            Some(code) => Style::value(code),
        }
    );
    println!(
        "  {}     {}",
        Style::label("speech"),
        config
            .speech
            .enabled
            .map_or_else(not_set, |enabled| Style::value(if enabled { "on" } else { "off" }))
    );
    println!(
        "  {}      {}",
        Style::label("model"),
        config
            .server
            .model
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!(
        "  {}       {}",
        Style::label("port"),
        config.server.port.map_or_else(not_set, Style::value)
    );
    println!();
}

fn prompt_endpoint(default: Option<&str>) -> Result<String> {
    let endpoint = Text::new("Relay URL:")
        .with_default(default.unwrap_or(DEFAULT_RELAY_URL))
        .with_help_message("Where 'tutor serve' is listening")
        .prompt()?;

    let endpoint = endpoint.trim();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        bail!("Relay URL must start with http:// or https://");
    }

    Ok(endpoint.trim_end_matches('/').to_string())
}

fn select_translation_language(default: Option<&str>) -> Result<String> {
    // Build options with format "code - Name"
    let mut options = vec![NO_TRANSLATION.to_string()];
    options.extend(
        SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, name)| format!("{code} - {name}")),
    );

    let default_index = match default.unwrap_or(DEFAULT_TRANSLATION_LANGUAGE) {
        "" => 0,
        d => SUPPORTED_LANGUAGES
            .iter()
            .position(|(code, _)| *code == d)
            .map_or(0, |idx| idx + 1),
    };

    let selection = Select::new("Translate replies into:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(language_code_from_option(&selection))
}

/// Extracts the code from a `code - Name` option. The no-translation option maps to "".
fn language_code_from_option(selection: &str) -> String {
    if selection == NO_TRANSLATION {
        return String::new();
    }
    selection
        .split(" - ")
        .next()
        .unwrap_or(selection)
        .to_string()
}

fn prompt_model(default: Option<&str>) -> Result<String> {
    let model = Text::new("Generative model:")
        .with_default(default.unwrap_or(DEFAULT_MODEL))
        .prompt()?;

    if model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }

    Ok(model.trim().to_string())
}
