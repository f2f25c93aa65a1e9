//! Chat mode UI components.

use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - English Conversation Practice",
        Style::header("tutor"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{}",
        Style::secondary("Say hello to start. The tutor replies in English.")
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye! Keep practicing."));
}

pub fn print_config(config: &SessionConfig) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint)
    );
    println!(
        "  {}  {}",
        Style::label("translate"),
        config
            .translate_to
            .as_deref()
            .map_or_else(|| Style::secondary("off"), Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("speech"),
        if config.speech.enabled {
            Style::value(&config.speech.program)
        } else {
            Style::secondary("muted")
        }
    );
    println!(
        "  {}      {}",
        Style::label("voice"),
        if config.speech.recognizer.is_empty() {
            Style::secondary("not configured")
        } else {
            Style::value(config.speech.recognizer.join(" "))
        }
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for (cmd, desc) in SLASH_COMMANDS {
        println!("  {:<10}{}", Style::command(cmd), Style::secondary(desc));
    }
    println!(
        "  {}",
        Style::hint("/listen <n> replays the n-th tutor reply")
    );
    println!(
        "  {}",
        Style::hint("Ctrl+C while the tutor is typing stops waiting")
    );
    println!();
}

pub fn print_listening() {
    println!(
        "{} {}",
        Style::label("Listening..."),
        Style::secondary("(Ctrl+C to stop)")
    );
}

pub fn print_notice(message: &str) {
    println!("{}", Style::warning(message));
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
