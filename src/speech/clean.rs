use regex::Regex;
use std::sync::LazyLock;

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    compiled("[\u{1F300}-\u{1FAFF}\u{1F600}-\u{1F64F}\u{2700}-\u{27BF}\u{1F900}-\u{1F9FF}]")
});
static EMOTICON: LazyLock<Regex> = LazyLock::new(|| compiled(r"[:;=8][\-^]?[)D\]]"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| compiled(r"\s{2,}"));

#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    // Patterns are compile-time constants
    Regex::new(pattern).expect("invalid built-in pattern")
}

/// Prepares reply text for speech: drops emoji and simple emoticons, collapses whitespace.
pub fn clean_text_for_speech(text: &str) -> String {
    let text = EMOJI.replace_all(text, "");
    let text = EMOTICON.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_emoji_and_emoticon() {
        assert_eq!(clean_text_for_speech("Great job! 😀 :)"), "Great job!");
    }

    #[test]
    fn test_removes_emoticon_variants() {
        assert_eq!(
            clean_text_for_speech("Nice ;-) see you =] soon :D"),
            "Nice see you soon"
        );
    }

    #[test]
    fn test_removes_dingbats_and_supplemental_symbols() {
        assert_eq!(clean_text_for_speech("Done ✅ 🤩 well 🌟"), "Done well");
    }

    #[test]
    fn test_keeps_plain_punctuation() {
        assert_eq!(
            clean_text_for_speech("Note: (this) is fine."),
            "Note: (this) is fine."
        );
    }

    #[test]
    fn test_empty_after_cleaning() {
        assert_eq!(clean_text_for_speech(" 😀 :) "), "");
    }

    #[test]
    fn test_collapses_newlines() {
        assert_eq!(clean_text_for_speech("Hello\n\nthere"), "Hello there");
    }
}
