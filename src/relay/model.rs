use async_trait::async_trait;

use super::error::RelayError;
use super::prompt::Persona;
use crate::conversation::Turn;

/// A single generation call against the hosted model.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub contents: &'a [Turn],
    pub system_instruction: &'a str,
    pub temperature: f32,
}

/// Seam to the external generative-model API.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the generated text for the request.
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, RelayError>;
}

/// Forwards a conversation to the model with the persona attached.
///
/// Exactly one call is made; the generated text is returned unchanged.
pub async fn relay(
    model: &dyn GenerativeModel,
    persona: &Persona,
    conversation: &[Turn],
) -> Result<String, RelayError> {
    let request = GenerateRequest {
        contents: conversation,
        system_instruction: &persona.instruction,
        temperature: persona.temperature,
    };

    model.generate(&request).await
}
