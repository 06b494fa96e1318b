//! Unified SDK error types.
//!
//! Every error is `Clone`: a coalesced request delivers the same failure to
//! every waiter attached to it.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// HTTP status of the final failed attempt, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Http(e) => e.status(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::MalformedResponse(e.to_string())
    }
}

/// HTTP-layer (network) errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Max retries exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: Box<HttpError> },
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::MaxRetriesExceeded { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Transport(format!("request timeout: {}", e))
        } else if e.is_connect() {
            HttpError::Transport(format!("connection failed: {}", e))
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_unwraps_retry_exhaustion() {
        let err = HttpError::MaxRetriesExceeded {
            attempts: 3,
            last: Box::new(HttpError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(SdkError::from(err).status(), Some(503));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = SdkError::Http(HttpError::Transport("reset".to_string()));
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "HTTP error: Request failed: reset");
    }

    #[test]
    fn test_serde_error_is_malformed() {
        let err: SdkError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(matches!(err, SdkError::MalformedResponse(_)));
    }
}
