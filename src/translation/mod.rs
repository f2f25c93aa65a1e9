//! Translation of tutor replies into the learner's language.

mod language;
mod prompt;

pub use language::{
    DEFAULT_TRANSLATION_LANGUAGE, SUPPORTED_LANGUAGES, language_name, print_languages,
    validate_language,
};
pub use prompt::{TRANSLATION_PROMPT_TEMPLATE, build_translation_prompt};
