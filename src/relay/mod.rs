//! Relay service: forwards a transcript to the hosted generative model.
//!
//! The relay is a single-attempt passthrough. It attaches the tutor persona and
//! sampling temperature, makes one model call per request and returns the text
//! unchanged. There are no retries, timeouts or caches.

mod error;
mod gemini;
mod model;
mod prompt;
mod server;

pub use error::RelayError;
pub use gemini::{DEFAULT_ENDPOINT, GeminiClient};
pub use model::{GenerateRequest, GenerativeModel, relay};
pub use prompt::{DEFAULT_MODEL, DEFAULT_PERSONA, DEFAULT_TEMPERATURE, Persona};
pub use server::{AppState, create_router, serve};
