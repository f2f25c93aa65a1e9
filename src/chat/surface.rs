//! Display surfaces that chat entries are mounted on.

use crate::render::{ChatEntry, render_entry, render_translation};
use crate::ui::Spinner;

/// Index of a mounted entry.
pub type EntryId = usize;

/// Where chat entries are shown. Entries are owned by the surface.
pub trait ChatSurface: Send {
    /// Shows a new entry and returns its id.
    fn mount(&mut self, entry: ChatEntry) -> EntryId;

    /// Adds a translation to an entry already shown.
    fn attach_translation(&mut self, id: EntryId, language: &str, text: &str);

    /// Shows or hides the typing indicator.
    fn set_typing(&mut self, typing: bool);

    fn entries(&self) -> &[ChatEntry];
}

/// Surface that only keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    entries: Vec<ChatEntry>,
    typing: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_typing(&self) -> bool {
        self.typing
    }
}

impl ChatSurface for MemorySurface {
    fn mount(&mut self, entry: ChatEntry) -> EntryId {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    fn attach_translation(&mut self, id: EntryId, language: &str, text: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.attach_translation(language, text);
        }
    }

    fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }
}

/// Surface printing entries to stdout, with a spinner as typing indicator.
#[derive(Default)]
pub struct TerminalSurface {
    entries: Vec<ChatEntry>,
    spinner: Option<Spinner>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatSurface for TerminalSurface {
    fn mount(&mut self, entry: ChatEntry) -> EntryId {
        self.spinner = None;
        println!("{}\n", render_entry(&entry));
        self.entries.push(entry);
        self.entries.len() - 1
    }

    fn attach_translation(&mut self, id: EntryId, language: &str, text: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.attach_translation(language, text);
            println!("{}\n", render_translation(language, text));
        }
    }

    fn set_typing(&mut self, typing: bool) {
        self.spinner = typing.then(|| Spinner::new("Tutor is typing..."));
    }

    fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }
}
