use async_trait::async_trait;
use reqwest::Client;
use std::borrow::Cow;

use super::error::ChatError;
use crate::conversation::{ChatRequest, ChatResult, ErrorBody, Turn};

/// Sends a conversation to the relay and returns the model's reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, conversation: &[Turn]) -> Result<String, ChatError>;
}

/// HTTP client for the relay's `POST /api/chat` route.
pub struct RelayClient {
    client: Client,
    url: String,
}

impl RelayClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/api/chat", endpoint.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for RelayClient {
    async fn complete(&self, conversation: &[Turn]) -> Result<String, ChatError> {
        let request = ChatRequest {
            conversation: Cow::Borrowed(conversation),
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Relay {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let reply: ChatResult =
            serde_json::from_str(&body).map_err(|e| ChatError::Decode(e.to_string()))?;

        Ok(reply.result)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_string(), |e| e.error)
}
