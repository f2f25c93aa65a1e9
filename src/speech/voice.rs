use regex::Regex;
use std::sync::LazyLock;

use super::Voice;

/// Voices tried first, matched as substrings of the voice name.
pub const DEFAULT_PREFERRED_VOICES: &[&str] = &[
    "Google UK English Female",
    "Google US English",
    "Samantha",
    "Victoria",
    "Ivy",
    "Karen",
    "en-US-Wavenet-F",
    "en-GB-Wavenet-F",
];

static FEMALE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new("(?i)female|woman").expect("invalid built-in pattern")
});

/// Picks the voice used for replies.
///
/// Order: a preferred name, then a name suggesting a female speaker, then any
/// English voice, then whatever comes first.
pub fn select_voice(voices: &[Voice], preferred: &[String]) -> Option<Voice> {
    voices
        .iter()
        .find(|v| preferred.iter().any(|p| v.name.contains(p.as_str())))
        .or_else(|| voices.iter().find(|v| FEMALE_NAME.is_match(&v.name)))
        .or_else(|| voices.iter().find(|v| v.lang.starts_with("en")))
        .or_else(|| voices.first())
        .cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    fn defaults() -> Vec<String> {
        DEFAULT_PREFERRED_VOICES
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_preferred_name_wins() {
        let voices = [
            voice("Microsoft Zira Female", "en-US"),
            voice("Samantha (Enhanced)", "en-US"),
        ];
        let chosen = select_voice(&voices, &defaults()).unwrap();
        assert_eq!(chosen.name, "Samantha (Enhanced)");
    }

    #[test]
    fn test_female_name_before_english() {
        let voices = [voice("Daniel", "en-GB"), voice("Anna WOMAN", "de-DE")];
        let chosen = select_voice(&voices, &defaults()).unwrap();
        assert_eq!(chosen.name, "Anna WOMAN");
    }

    #[test]
    fn test_english_before_first() {
        let voices = [voice("Thomas", "fr-FR"), voice("Daniel", "en-GB")];
        let chosen = select_voice(&voices, &defaults()).unwrap();
        assert_eq!(chosen.name, "Daniel");
    }

    #[test]
    fn test_falls_back_to_first() {
        let voices = [voice("Thomas", "fr-FR"), voice("Yuna", "ko-KR")];
        let chosen = select_voice(&voices, &defaults()).unwrap();
        assert_eq!(chosen.name, "Thomas");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(select_voice(&[], &defaults()).is_none());
    }
}
