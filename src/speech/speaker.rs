use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use super::{
    DEFAULT_SPEECH_LANGUAGE, SpeechError, SpeechSettings, SpeechSynthesizer, Utterance, Voice,
    clean_text_for_speech, select_voice,
};

/// Plays replies aloud, one at a time.
///
/// Playback runs as a detached task. Starting a new utterance aborts the one
/// in progress. The voice is chosen on first use and kept for the lifetime of
/// the speaker; while no voice can be found, every utterance looks again.
pub struct Speaker {
    inner: Arc<SpeakerInner>,
    current: Mutex<Option<JoinHandle<()>>>,
}

struct SpeakerInner {
    synth: Arc<dyn SpeechSynthesizer>,
    preferred: Vec<String>,
    rate: f32,
    pitch: f32,
    voice: OnceCell<Voice>,
}

impl Speaker {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>, settings: &SpeechSettings) -> Self {
        Self {
            inner: Arc::new(SpeakerInner {
                synth,
                preferred: settings.preferred_voices.clone(),
                rate: settings.rate,
                pitch: settings.pitch,
                voice: OnceCell::new(),
            }),
            current: Mutex::new(None),
        }
    }

    /// Starts speaking `text` in the background.
    ///
    /// Returns `false` when nothing speakable is left after cleaning.
    pub fn speak(&self, text: &str) -> bool {
        let cleaned = clean_text_for_speech(text);
        if cleaned.is_empty() {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.abort();
        }
        *current = Some(tokio::spawn(async move {
            if let Err(e) = inner.play(cleaned).await {
                tracing::debug!(error = %e, "speech playback failed");
            }
        }));

        true
    }

    /// Stops any playback in progress.
    pub fn stop(&self) {
        if let Some(handle) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }

    /// Waits for the current playback, if any, to end.
    pub async fn finish(&self) {
        let handle = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// The voice replies are spoken with.
    pub async fn voice(&self) -> Option<Voice> {
        self.inner.resolve_voice().await
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl SpeakerInner {
    async fn resolve_voice(&self) -> Option<Voice> {
        let resolved = self
            .voice
            .get_or_try_init(|| async {
                let catalog = match self.synth.voices().await? {
                    voices if voices.is_empty() => self.synth.voices_changed().await?,
                    voices => voices,
                };
                select_voice(&catalog, &self.preferred)
                    .ok_or_else(|| SpeechError::Unavailable("no voice in catalog".to_string()))
            })
            .await;

        match resolved {
            Ok(voice) => Some(voice.clone()),
            Err(e) => {
                tracing::debug!(error = %e, "voice catalog unavailable");
                None
            }
        }
    }

    async fn play(&self, text: String) -> Result<(), SpeechError> {
        let voice = self.resolve_voice().await;
        let lang = voice
            .as_ref()
            .map_or_else(|| DEFAULT_SPEECH_LANGUAGE.to_string(), |v| v.lang.clone());

        let utterance = Utterance {
            text,
            voice,
            lang,
            rate: self.rate,
            pitch: self.pitch,
            volume: 1.0,
        };

        self.synth.speak(&utterance).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSynth {
        catalog: Vec<Voice>,
        late_catalog: Vec<Voice>,
        catalog_calls: AtomicUsize,
        failures_left: AtomicUsize,
        started: Mutex<Vec<Utterance>>,
        finished: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSynth {
        async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SpeechError::Failed("catalog query failed".to_string()));
            }
            Ok(self.catalog.clone())
        }

        async fn voices_changed(&self) -> Result<Vec<Voice>, SpeechError> {
            Ok(self.late_catalog.clone())
        }

        async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
            self.started.lock().unwrap().push(utterance.clone());
            if utterance.text.starts_with("long") {
                std::future::pending::<()>().await;
            }
            self.finished.lock().unwrap().push(utterance.text.clone());
            Ok(())
        }
    }

    fn voice(name: &str, lang: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    #[tokio::test]
    async fn test_speaks_cleaned_text_with_selected_voice() {
        let synth = Arc::new(FakeSynth {
            catalog: vec![voice("Thomas", "fr-FR"), voice("Karen", "en-AU")],
            ..FakeSynth::default()
        });
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        assert!(speaker.speak("Well done! 😀"));
        speaker.finish().await;

        let started = synth.started.lock().unwrap();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].text, "Well done!");
        assert_eq!(started[0].voice.as_ref().unwrap().name, "Karen");
        assert_eq!(started[0].lang, "en-AU");
        assert!((started[0].rate - 0.95).abs() < f32::EPSILON);
        assert!((started[0].pitch - 1.05).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_nothing_to_say() {
        let synth = Arc::new(FakeSynth::default());
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        assert!(!speaker.speak(":) 😀"));
        speaker.finish().await;
        assert!(synth.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_utterance_cancels_previous() {
        let synth = Arc::new(FakeSynth::default());
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        speaker.speak("long answer");
        while synth.started.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        speaker.speak("short answer");
        speaker.finish().await;

        assert_eq!(synth.started.lock().unwrap().len(), 2);
        assert_eq!(*synth.finished.lock().unwrap(), vec!["short answer"]);
    }

    #[tokio::test]
    async fn test_voice_is_resolved_once() {
        let synth = Arc::new(FakeSynth {
            catalog: vec![voice("Daniel", "en-GB")],
            ..FakeSynth::default()
        });
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        speaker.speak("one");
        speaker.finish().await;
        speaker.speak("two");
        speaker.finish().await;

        assert_eq!(synth.catalog_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waits_for_catalog_when_empty() {
        let synth = Arc::new(FakeSynth {
            late_catalog: vec![voice("Victoria", "en-US")],
            ..FakeSynth::default()
        });
        let speaker = Speaker::new(synth, &SpeechSettings::default());

        assert_eq!(speaker.voice().await.unwrap().name, "Victoria");
    }

    #[tokio::test]
    async fn test_no_voice_uses_default_language() {
        let synth = Arc::new(FakeSynth::default());
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        speaker.speak("hello");
        speaker.finish().await;

        let started = synth.started.lock().unwrap();
        assert!(started[0].voice.is_none());
        assert_eq!(started[0].lang, DEFAULT_SPEECH_LANGUAGE);
    }

    #[tokio::test]
    async fn test_failed_catalog_query_is_retried() {
        let synth = Arc::new(FakeSynth {
            catalog: vec![voice("Samantha", "en-US")],
            failures_left: AtomicUsize::new(1),
            ..FakeSynth::default()
        });
        let speaker = Speaker::new(synth.clone(), &SpeechSettings::default());

        assert!(speaker.voice().await.is_none());
        assert_eq!(speaker.voice().await.unwrap().name, "Samantha");
        assert_eq!(speaker.voice().await.unwrap().name, "Samantha");
        assert_eq!(synth.catalog_calls.load(Ordering::SeqCst), 2);
    }
}
