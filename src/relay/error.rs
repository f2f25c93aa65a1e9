//! Relay errors and their JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::conversation::ErrorBody;

/// Errors raised while relaying a conversation to the model.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The request body does not have the expected shape.
    #[error("{0}")]
    InvalidInput(String),
    /// The model call failed (network, quota, malformed response, missing key).
    #[error("{0}")]
    Upstream(String),
}

impl RelayError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
