pub const DEFAULT_PERSONA: &str = "You are a friendly English speaking tutor who helps users \
     practice conversation and improve vocabulary.";

pub const DEFAULT_TEMPERATURE: f32 = 0.9;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Fixed instruction and sampling settings attached to every model call.
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    pub instruction: String,
    pub temperature: f32,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_PERSONA.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}
