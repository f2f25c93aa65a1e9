//! Speech input and output.
//!
//! Engines sit behind [`SpeechSynthesizer`] and [`SpeechRecognizer`]. When an
//! engine is missing the feature quietly stays off.

mod clean;
mod command;
mod recognizer;
mod speaker;
mod voice;

use async_trait::async_trait;

pub use clean::clean_text_for_speech;
pub use command::{CommandRecognizer, CommandSynthesizer, parse_espeak_voices};
pub use recognizer::capture_utterance;
pub use speaker::Speaker;
pub use voice::{DEFAULT_PREFERRED_VOICES, select_voice};

/// Language used when no voice supplies one.
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// A voice offered by a synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 style tag, e.g. `en-US`.
    pub lang: String,
}

/// A single request to speak text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub lang: String,
    /// 1.0 is the engine's normal speed.
    pub rate: f32,
    /// 1.0 is the engine's normal pitch.
    pub pitch: f32,
    /// 0.0 to 1.0.
    pub volume: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The engine is not installed or not configured.
    #[error("speech unavailable: {0}")]
    Unavailable(String),
    #[error("speech engine failed: {0}")]
    Failed(String),
}

/// Text-to-speech engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Current voice catalog. May be empty until the engine is ready.
    async fn voices(&self) -> Result<Vec<Voice>, SpeechError>;

    /// Resolves once the catalog has been populated.
    async fn voices_changed(&self) -> Result<Vec<Voice>, SpeechError> {
        self.voices().await
    }

    /// Speaks the utterance, returning when playback finishes.
    ///
    /// Dropping the future must stop playback.
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

/// Speech-to-text engine capturing a single utterance.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listens until one utterance has been recognised.
    ///
    /// Returns `None` when nothing was heard. Dropping the future must stop capture.
    async fn recognize(&self) -> Result<Option<String>, SpeechError>;
}

/// Resolved speech settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    pub enabled: bool,
    /// Synthesizer program (espeak-ng compatible).
    pub program: String,
    pub preferred_voices: Vec<String>,
    pub rate: f32,
    pub pitch: f32,
    /// Recognition locale.
    pub language: String,
    /// Capture command; empty when voice input is not configured.
    pub recognizer: Vec<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "espeak-ng".to_string(),
            preferred_voices: DEFAULT_PREFERRED_VOICES
                .iter()
                .map(ToString::to_string)
                .collect(),
            rate: 0.95,
            pitch: 1.05,
            language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            recognizer: Vec::new(),
        }
    }
}
