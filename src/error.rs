//! Error types for the Sub200 TTS adapter.
//!
//! Every failure is terminal for the call that produced it; the adapter never
//! retries internally. Transport-level faults from `reqwest` are folded into
//! the taxonomy via the `From` impl below so call sites can use `?` directly
//! on `send()` and body reads.

use thiserror::Error;

/// Result type for TTS operations
pub type TtsResult<T> = Result<T, TtsError>;

/// Failure taxonomy for a single synthesis call.
#[derive(Debug, Error)]
pub enum TtsError {
    /// The request exceeded its deadline, or the server answered 408/504.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The server answered with an error status; carries status and body text.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The response body is not a well-formed or complete WAV stream.
    #[error("payload error: {0}")]
    Payload(String),

    /// Transport-level failure (DNS, connect, TLS, mid-stream read fault).
    #[error("network error: {0}")]
    Network(String),

    /// No usable endpoint or otherwise unusable construction-time settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("sub200 TTS request timed out".to_string())
        } else {
            Self::Network(format!("sub200 network error: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = TtsError::Status {
            status: 500,
            body: "internal error".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): internal error");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = TtsError::Timeout("sub200 TTS request timed out".to_string());
        assert_eq!(err.to_string(), "timeout: sub200 TTS request timed out");
    }

    #[test]
    fn test_payload_error_display() {
        let err = TtsError::Payload("no audio data".to_string());
        assert_eq!(err.to_string(), "payload error: no audio data");
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = TtsError::InvalidConfiguration("base URL must be provided".to_string());
        assert!(err.to_string().contains("invalid configuration"));
    }
}
