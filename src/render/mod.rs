//! Message rendering: reply formatting, chat entries and their terminal display.

mod blocks;
mod display;
mod entry;

pub use blocks::{MessageBlock, format_bot_message, format_user_message};
pub use display::{render_entry, render_translation};
pub use entry::{ChatEntry, Sender, Translation};
