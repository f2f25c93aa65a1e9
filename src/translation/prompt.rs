pub const TRANSLATION_PROMPT_TEMPLATE: &str =
    "Translate the following English text into {target_language} only:\n\n{text}";

/// Builds the one-off instruction used to translate a tutor reply.
#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_translation_prompt(target_language: &str, text: &str) -> String {
    // {target_language} and {text} are placeholders for string replacement, not format arguments
    TRANSLATION_PROMPT_TEMPLATE
        .replace("{target_language}", target_language)
        .replacen("{text}", text, 1)
}
