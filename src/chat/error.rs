/// Errors from a relay exchange, as seen by the chat client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("failed to reach the relay: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay responded with status {status}: {message}")]
    Relay { status: u16, message: String },
    #[error("unexpected relay response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_display() {
        let err = ChatError::Relay {
            status: 500,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "relay responded with status 500: quota exceeded"
        );
    }
}
