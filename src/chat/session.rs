use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::sync::Arc;

use super::client::RelayClient;
use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::orchestrator::{Orchestrator, SendOutcome, TranslationTarget};
use super::surface::TerminalSurface;
use super::ui;
use crate::speech::{CommandRecognizer, CommandSynthesizer, SpeechSettings, Speaker};

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the relay.
    pub endpoint: String,
    /// Language code replies are translated into, if any.
    pub translate_to: Option<String>,
    pub speech: SpeechSettings,
}

impl SessionConfig {
    pub const fn new(
        endpoint: String,
        translate_to: Option<String>,
        speech: SpeechSettings,
    ) -> Self {
        Self {
            endpoint,
            translate_to,
            speech,
        }
    }
}

/// An interactive practice conversation with the tutor.
///
/// Provides a REPL-style interface; the transcript lives as long as the session.
pub struct ChatSession {
    config: SessionConfig,
    orchestrator: Orchestrator<RelayClient, TerminalSurface>,
    recognizer: Option<CommandRecognizer>,
}

impl ChatSession {
    /// Creates a new chat session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        let mut orchestrator =
            Orchestrator::new(RelayClient::new(&config.endpoint), TerminalSurface::new());

        if let Some(code) = &config.translate_to {
            orchestrator = orchestrator.with_translation(TranslationTarget::new(code));
        }
        if config.speech.enabled {
            let synth = Arc::new(CommandSynthesizer::new(config.speech.program.clone()));
            orchestrator = orchestrator.with_speaker(Speaker::new(synth, &config.speech));
        }

        let recognizer = (!config.speech.recognizer.is_empty()).then(|| {
            CommandRecognizer::new(
                config.speech.recognizer.clone(),
                config.speech.language.clone(),
            )
        });

        Self {
            config,
            orchestrator,
            recognizer,
        }
    }

    pub async fn run(&self) -> Result<()> {
        ui::print_header();

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd).await {
                            break;
                        }
                    }
                    Input::Text(text) => {
                        self.send(&text).await;
                    }
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(speaker) = self.orchestrator.speaker() {
            speaker.stop();
        }
        ui::print_goodbye();
        Ok(())
    }

    async fn handle_command(&self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => ui::print_config(&self.config),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Listen(nth) => self.listen(nth),
            SlashCommand::Voice => self.voice().await,
            SlashCommand::Quit => return false,
            SlashCommand::Unknown(cmd) => ui::print_error(&format!("Unknown command: /{cmd}")),
        }
        true
    }

    async fn send(&self, text: &str) {
        let outcome = self.orchestrator.send_until(text, interrupt()).await;
        report(outcome);
    }

    fn listen(&self, nth: Option<usize>) {
        if self.orchestrator.speaker().is_none() {
            ui::print_notice("Speech is muted.");
            return;
        }
        let played = self
            .orchestrator
            .listenable_entry(nth)
            .is_some_and(|id| self.orchestrator.listen(id));
        if !played {
            ui::print_notice("Nothing to play yet.");
        }
    }

    async fn voice(&self) {
        let Some(recognizer) = &self.recognizer else {
            ui::print_notice("Voice input is not configured. Set speech.recognizer in the config.");
            return;
        };

        ui::print_listening();
        match self.orchestrator.send_voice(recognizer, interrupt()).await {
            SendOutcome::Empty => ui::print_notice("Nothing was heard."),
            outcome => report(outcome),
        }
    }
}

/// Resolves on Ctrl+C.
///
/// Only awaited while an exchange or a capture is running; the prompt reads
/// Ctrl+C as a key press.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

fn report(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Dropped => {
            ui::print_notice("The tutor is still answering. Try again in a moment.");
        }
        SendOutcome::Interrupted => ui::print_notice("Stopped waiting for the tutor."),
        SendOutcome::Empty | SendOutcome::Replied { .. } | SendOutcome::Failed => {}
    }
}
