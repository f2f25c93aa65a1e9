//! Conversation orchestrator: drives one exchange at a time through the relay.
//!
//! An exchange moves `Idle -> AwaitingReply -> AwaitingTranslation -> Idle`.
//! A send that arrives while an exchange is in flight is dropped without any
//! effect. The state always returns to `Idle` when an exchange ends, whether
//! it succeeded, failed or was interrupted.

use std::future::Future;
use std::pin::pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::client::ChatBackend;
use super::surface::{ChatSurface, EntryId};
use crate::conversation::{Transcript, Turn};
use crate::render::{ChatEntry, Sender};
use crate::speech::{SpeechError, SpeechRecognizer, Speaker, capture_utterance};
use crate::translation::{build_translation_prompt, language_name};

/// Bot message shown when an exchange fails.
pub const FALLBACK_APOLOGY: &str = "Maaf, terjadi kesalahan. Coba lagi nanti.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingReply,
    AwaitingTranslation,
}

/// What happened to a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send after trimming.
    Empty,
    /// Another exchange was in flight.
    Dropped,
    /// The reply was shown; `translated` tells whether a translation was attached.
    Replied { entry: EntryId, translated: bool },
    /// The relay call failed and the apology was shown.
    Failed,
    /// The exchange was abandoned before it settled.
    Interrupted,
}

/// Language replies are translated into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTarget {
    pub code: String,
    pub name: String,
}

impl TranslationTarget {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: language_name(code).unwrap_or(code).to_string(),
        }
    }
}

struct SessionState {
    transcript: Transcript,
    state: ExchangeState,
}

/// Owned context of one chat session.
///
/// Created when a chat starts and dropped when it ends. The transcript lives
/// only here.
pub struct Orchestrator<B, S> {
    backend: B,
    surface: Mutex<S>,
    session: Mutex<SessionState>,
    speaker: Option<Speaker>,
    translation: Option<TranslationTarget>,
}

/// Returns the session to `Idle` when the exchange ends, however it ends.
struct ExchangeGuard<'a> {
    session: &'a Mutex<SessionState>,
}

impl ExchangeGuard<'_> {
    fn reply_received(&self, reply: &str) {
        let mut session = lock(self.session);
        session.transcript.push(Turn::model(reply));
        session.state = ExchangeState::AwaitingTranslation;
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        lock(self.session).state = ExchangeState::Idle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B, S> Orchestrator<B, S>
where
    B: ChatBackend,
    S: ChatSurface,
{
    pub fn new(backend: B, surface: S) -> Self {
        Self {
            backend,
            surface: Mutex::new(surface),
            session: Mutex::new(SessionState {
                transcript: Transcript::new(),
                state: ExchangeState::Idle,
            }),
            speaker: None,
            translation: None,
        }
    }

    #[must_use]
    pub fn with_speaker(mut self, speaker: Speaker) -> Self {
        self.speaker = Some(speaker);
        self
    }

    #[must_use]
    pub fn with_translation(mut self, target: TranslationTarget) -> Self {
        self.translation = Some(target);
        self
    }

    pub fn state(&self) -> ExchangeState {
        lock(&self.session).state
    }

    pub fn is_idle(&self) -> bool {
        self.state() == ExchangeState::Idle
    }

    /// A snapshot of the transcript.
    pub fn transcript(&self) -> Vec<Turn> {
        lock(&self.session).transcript.turns().to_vec()
    }

    pub const fn translation(&self) -> Option<&TranslationTarget> {
        self.translation.as_ref()
    }

    pub const fn speaker(&self) -> Option<&Speaker> {
        self.speaker.as_ref()
    }

    /// Runs `f` with exclusive access to the display surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.surface))
    }

    /// Sends user text and runs the whole exchange: reply, speech, translation.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        let Some((guard, conversation)) = self.begin_exchange(text) else {
            tracing::debug!("exchange in flight, dropping send");
            return SendOutcome::Dropped;
        };

        self.with_surface(|surface| {
            surface.mount(ChatEntry::user(text));
            surface.set_typing(true);
        });

        let reply = self.backend.complete(&conversation).await;
        self.with_surface(|surface| surface.set_typing(false));

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat exchange failed");
                self.with_surface(|surface| surface.mount(ChatEntry::bot(FALLBACK_APOLOGY, false)));
                return SendOutcome::Failed;
            }
        };

        guard.reply_received(&reply);
        let entry = self.with_surface(|surface| surface.mount(ChatEntry::bot(&reply, true)));

        if let Some(speaker) = &self.speaker {
            speaker.speak(&reply);
        }

        let translated = self.translate(entry, &reply).await;
        drop(guard);

        SendOutcome::Replied { entry, translated }
    }

    /// Runs [`send`](Self::send) until `stop` resolves.
    ///
    /// A stop abandons the exchange: the user turn stays in the transcript,
    /// no reply is shown and the state returns to `Idle`.
    pub async fn send_until<F>(&self, text: &str, stop: F) -> SendOutcome
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = stop => {
                self.with_surface(|surface| surface.set_typing(false));
                tracing::debug!("exchange interrupted");
                SendOutcome::Interrupted
            }
            outcome = self.send(text) => outcome,
        }
    }

    /// Captures one spoken utterance and sends it.
    ///
    /// `stop` abandons the capture, or the exchange once the utterance was
    /// sent. Missing speech support sends nothing.
    pub async fn send_voice<F>(&self, recognizer: &dyn SpeechRecognizer, stop: F) -> SendOutcome
    where
        F: Future<Output = ()>,
    {
        let mut stop = pin!(stop);
        match capture_utterance(recognizer, stop.as_mut()).await {
            Ok(Some(text)) => self.send_until(&text, stop).await,
            Ok(None) => SendOutcome::Empty,
            Err(SpeechError::Unavailable(reason)) => {
                tracing::debug!(%reason, "voice input unavailable");
                SendOutcome::Empty
            }
            Err(e) => {
                tracing::warn!(error = %e, "voice capture failed");
                SendOutcome::Empty
            }
        }
    }

    /// Speaks a bot entry again. Returns `false` when there is nothing to play.
    pub fn listen(&self, id: EntryId) -> bool {
        let Some(speaker) = &self.speaker else {
            return false;
        };
        let raw = self.with_surface(|surface| {
            surface
                .entries()
                .get(id)
                .filter(|entry| entry.listenable)
                .map(|entry| entry.raw.clone())
        });
        raw.is_some_and(|text| speaker.speak(&text))
    }

    /// Id of a bot entry offering playback.
    ///
    /// `nth` counts such entries from 1; `None` picks the most recent.
    pub fn listenable_entry(&self, nth: Option<usize>) -> Option<EntryId> {
        self.with_surface(|surface| {
            let mut ids = surface
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.sender == Sender::Bot && entry.listenable)
                .map(|(id, _)| id);
            match nth {
                Some(n) => ids.nth(n.checked_sub(1)?),
                None => ids.last(),
            }
        })
    }

    fn begin_exchange(&self, text: &str) -> Option<(ExchangeGuard<'_>, Vec<Turn>)> {
        let mut session = lock(&self.session);
        if session.state != ExchangeState::Idle {
            return None;
        }
        session.state = ExchangeState::AwaitingReply;
        session.transcript.push(Turn::user(text));
        let conversation = session.transcript.turns().to_vec();
        drop(session);

        Some((
            ExchangeGuard {
                session: &self.session,
            },
            conversation,
        ))
    }

    /// Best-effort translation of a reply. Failures leave the entry untouched.
    async fn translate(&self, entry: EntryId, reply: &str) -> bool {
        let Some(target) = &self.translation else {
            return false;
        };

        let request = [Turn::user(build_translation_prompt(&target.name, reply))];
        match self.backend.complete(&request).await {
            Ok(translation) if !translation.trim().is_empty() => {
                self.with_surface(|surface| {
                    surface.attach_translation(entry, &target.name, translation.trim());
                });
                true
            }
            Ok(_) => {
                tracing::debug!("translation came back empty");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "translation failed");
                false
            }
        }
    }
}
