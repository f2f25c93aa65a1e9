//! Speech engines backed by external programs.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{SpeechError, SpeechRecognizer, SpeechSynthesizer, Utterance, Voice};

const NORMAL_WORDS_PER_MINUTE: f32 = 175.0;
const NORMAL_PITCH: f32 = 50.0;

fn spawn_error(program: &str, err: &std::io::Error) -> SpeechError {
    if err.kind() == ErrorKind::NotFound {
        SpeechError::Unavailable(format!("'{program}' is not installed"))
    } else {
        SpeechError::Failed(format!("failed to run '{program}': {err}"))
    }
}

/// Synthesizer driving an espeak-ng compatible program.
pub struct CommandSynthesizer {
    program: String,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(&self.program, &e))?;

        if !output.status.success() {
            return Err(SpeechError::Failed(format!(
                "'{} --voices' exited with {}",
                self.program, output.status
            )));
        }

        Ok(parse_espeak_voices(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let voice = utterance
            .voice
            .as_ref()
            .map_or_else(|| utterance.lang.to_lowercase(), |v| v.lang.clone());
        let speed = (NORMAL_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        let pitch = (NORMAL_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 200.0) as u32;

        let mut child = Command::new(&self.program)
            .args(["-v", &voice])
            .args(["-s", &speed.to_string()])
            .args(["-p", &pitch.to_string()])
            .args(["-a", &amplitude.to_string()])
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&self.program, &e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(utterance.text.as_bytes())
                .await
                .map_err(|e| SpeechError::Failed(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SpeechError::Failed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Failed(format!(
                "'{}' exited with {status}",
                self.program
            )))
        }
    }
}

/// Parses the table printed by `espeak-ng --voices`.
///
/// Columns: priority, language, age/gender, voice name, file, other languages.
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let _priority = columns.next()?;
            let lang = columns.next()?;
            let _age_gender = columns.next()?;
            let name = columns.next()?;
            Some(Voice {
                name: name.replace('_', " "),
                lang: lang.to_string(),
            })
        })
        .collect()
}

/// Recognizer that runs an external capture command for one utterance.
///
/// The command records until the speaker stops and prints the transcript on
/// stdout. The recognition locale is passed in `TUTOR_SPEECH_LANG`.
pub struct CommandRecognizer {
    argv: Vec<String>,
    language: String,
}

impl CommandRecognizer {
    pub fn new(argv: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            argv,
            language: language.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<Option<String>, SpeechError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(SpeechError::Unavailable(
                "no speech capture command configured".to_string(),
            ));
        };

        let output = Command::new(program)
            .args(args)
            .env("TUTOR_SPEECH_LANG", &self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(program, &e))?;

        if !output.status.success() {
            return Err(SpeechError::Failed(format!(
                "'{program}' exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!transcript.is_empty()).then_some(transcript))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en         (en 2)
 2  en-us           --/F      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn test_parse_espeak_voices() {
        let voices = parse_espeak_voices(VOICES);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].lang, "af");
        assert_eq!(voices[1].name, "English (Great Britain)");
        assert_eq!(voices[2].lang, "en-us");
    }

    #[test]
    fn test_parse_ignores_short_lines() {
        assert!(parse_espeak_voices("\n  5 af\n").is_empty());
    }

    #[tokio::test]
    async fn test_missing_synthesizer_is_unavailable() {
        let synth = CommandSynthesizer::new("tutor-test-no-such-tts-program");
        let err = synth.voices().await.unwrap_err();
        assert!(matches!(err, SpeechError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_recognizer_is_unavailable() {
        let recognizer = CommandRecognizer::new(Vec::new(), "en-US");
        let err = recognizer.recognize().await.unwrap_err();
        assert!(matches!(err, SpeechError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_reads_transcript() {
        let recognizer = CommandRecognizer::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo \"  I like $TUTOR_SPEECH_LANG  \"".to_string(),
            ],
            "en-US",
        );
        assert_eq!(
            recognizer.recognize().await.unwrap(),
            Some("I like en-US".to_string())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_silence_is_none() {
        let recognizer = CommandRecognizer::new(
            vec!["sh".to_string(), "-c".to_string(), "true".to_string()],
            "en-US",
        );
        assert_eq!(recognizer.recognize().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_failure() {
        let recognizer = CommandRecognizer::new(
            vec!["sh".to_string(), "-c".to_string(), "echo boom >&2; exit 3".to_string()],
            "en-US",
        );
        let err = recognizer.recognize().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
