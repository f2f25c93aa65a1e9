use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::error::RelayError;
use super::model::{GenerateRequest, GenerativeModel};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

// Borrowed views over the request so turns are not cloned for serialization
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, RelayError> {
        let Some(api_key) = &self.api_key else {
            return Err(RelayError::Upstream(
                "API key is not configured for the generative model".to_string(),
            ));
        };

        let body = build_request_body(request);
        let url = self.url();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::Upstream(api_error_message(status, &text)));
        }

        parse_response_text(&text)
    }
}

fn build_request_body<'a>(request: &'a GenerateRequest<'a>) -> GenerateContentRequest<'a> {
    let contents = request
        .contents
        .iter()
        .map(|turn| Content {
            role: Some(turn.role.as_str()),
            parts: vec![Part {
                text: Cow::Borrowed(&turn.text),
            }],
        })
        .collect();

    GenerateContentRequest {
        contents,
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: Cow::Borrowed(request.system_instruction),
            }],
        },
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body).map_or_else(
        |_| format!("Model request failed with status {status}: {body}"),
        |parsed| parsed.error.message,
    )
}

/// Concatenates the text parts of the first candidate.
fn parse_response_text(body: &str) -> Result<String, RelayError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Upstream(format!("Malformed model response: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::Upstream("Model returned no candidates".to_string()))?;

    Ok(candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default())
}
