use std::future::Future;

use super::{SpeechError, SpeechRecognizer};

/// Waits for the first recognised utterance, or until `stop` resolves.
///
/// A stop before anything was recognised yields `Ok(None)`; capture is
/// abandoned by dropping the recognizer's future.
pub async fn capture_utterance<F>(
    recognizer: &dyn SpeechRecognizer,
    stop: F,
) -> Result<Option<String>, SpeechError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = stop => Ok(None),
        result = recognizer.recognize() => Ok(result?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())),
    }
}
