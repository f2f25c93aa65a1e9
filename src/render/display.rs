//! Terminal rendering of chat entries.

use std::fmt::Write;

use super::blocks::MessageBlock;
use super::entry::{ChatEntry, Sender};
use crate::ui::Style;

const BULLET: &str = "•";

/// Renders an entry as terminal lines, ending with its timestamp.
pub fn render_entry(entry: &ChatEntry) -> String {
    let mut out = String::new();

    let name = match entry.sender {
        Sender::User => Style::user_label("You"),
        Sender::Bot => Style::bot_label("Tutor"),
    };
    let _ = writeln!(out, "{name}");

    for block in &entry.blocks {
        match block {
            MessageBlock::Paragraph(text) => {
                for line in text.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
            MessageBlock::List(items) => {
                for item in items {
                    let _ = writeln!(out, "    {BULLET} {item}");
                }
            }
        }
    }

    if let Some(translation) = &entry.translation {
        let _ = writeln!(
            out,
            "{}",
            render_translation(&translation.language, &translation.text)
        );
    }

    let mut footer = Style::secondary(&entry.timestamp);
    if entry.listenable {
        let _ = write!(footer, "  {}", Style::hint("/listen to hear it"));
    }
    let _ = write!(out, "  {footer}");

    out
}

/// Renders a translation block, as attached under a bot entry.
pub fn render_translation(language: &str, text: &str) -> String {
    let mut out = format!(
        "  {}",
        Style::translation_label(format!("Translation ({language})"))
    );
    for line in text.lines() {
        let _ = write!(out, "\n  {}", Style::secondary(line));
    }
    out
}
