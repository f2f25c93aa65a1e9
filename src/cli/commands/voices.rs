use anyhow::Result;

use crate::config::{ClientResolveOptions, ConfigManager, resolve_client_config};
use crate::speech::{CommandSynthesizer, SpeechSynthesizer, select_voice};
use crate::ui::Style;

/// Lists the synthesizer's voices and marks the one replies are spoken with.
pub async fn print_voices() -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let settings = resolve_client_config(&ClientResolveOptions::default(), &file_config)?.speech;

    let synth = CommandSynthesizer::new(settings.program.clone());
    let voices = synth.voices().await?;

    if voices.is_empty() {
        println!(
            "{}",
            Style::warning(format!("'{}' reported no voices", settings.program))
        );
        return Ok(());
    }

    let selected = select_voice(&voices, &settings.preferred_voices);

    println!("{}", Style::header("Available voices"));
    for voice in &voices {
        let marker = if selected.as_ref() == Some(voice) {
            Style::success("*")
        } else {
            " ".to_string()
        };
        println!(
            "{marker} {:<8} {}",
            Style::code(&voice.lang),
            Style::value(&voice.name)
        );
    }
    println!();
    println!("{}", Style::hint("* voice used for tutor replies"));

    Ok(())
}
