use chrono::{Local, NaiveTime, Timelike};

use super::blocks::{MessageBlock, format_bot_message, format_user_message};

/// Who a chat entry is shown as coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A translation attached to a bot entry after it was mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub language: String,
    pub text: String,
}

/// One rendered message bubble.
///
/// Entries belong to the display surface and are never read back into the
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub sender: Sender,
    /// Text as received, before block formatting. Used for speech playback.
    pub raw: String,
    pub blocks: Vec<MessageBlock>,
    /// Whether the entry offers a "listen" control.
    pub listenable: bool,
    pub translation: Option<Translation>,
    /// Creation time as `HH:MM`.
    pub timestamp: String,
}

impl ChatEntry {
    pub fn user(text: &str) -> Self {
        Self::user_at(text, Local::now().time())
    }

    pub fn bot(text: &str, listenable: bool) -> Self {
        Self::bot_at(text, listenable, Local::now().time())
    }

    pub fn user_at(text: &str, time: NaiveTime) -> Self {
        Self {
            sender: Sender::User,
            raw: text.to_string(),
            blocks: format_user_message(text),
            listenable: false,
            translation: None,
            timestamp: format_timestamp(time),
        }
    }

    pub fn bot_at(text: &str, listenable: bool, time: NaiveTime) -> Self {
        Self {
            sender: Sender::Bot,
            raw: text.to_string(),
            blocks: format_bot_message(text),
            listenable,
            translation: None,
            timestamp: format_timestamp(time),
        }
    }

    pub fn attach_translation(&mut self, language: &str, text: &str) {
        self.translation = Some(Translation {
            language: language.to_string(),
            text: text.to_string(),
        });
    }
}

fn format_timestamp(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}
