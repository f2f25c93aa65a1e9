//! Interactive practice conversation with the tutor.
//!
//! The [`Orchestrator`] owns the transcript and runs one exchange at a time
//! against the relay. [`ChatSession`] wraps it in a REPL with slash commands.

mod client;
/// Slash command parsing and autocomplete.
pub mod command;
mod error;
mod orchestrator;
mod session;
mod surface;
mod ui;

pub use client::{ChatBackend, RelayClient};
pub use error::ChatError;
pub use orchestrator::{
    ExchangeState, FALLBACK_APOLOGY, Orchestrator, SendOutcome, TranslationTarget,
};
pub use session::{ChatSession, SessionConfig};
pub use surface::{ChatSurface, EntryId, MemorySurface, TerminalSurface};
