//! Generation call failures

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Why a generation call produced no text
#[derive(Error, Debug)]
pub enum LLMError {
    /// The endpoint refused the credentials (HTTP 401)
    #[error("model endpoint rejected the API key")]
    Unauthorized,

    /// Any other non-success HTTP status, with the body the server sent
    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout or body decoding failure
    #[cfg(feature = "openai")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The reply parsed but carried no usable completion
    #[error("malformed completion: {0}")]
    MalformedResponse(String),

    /// A required setting is absent
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl LLMError {
    /// Build the error for a non-success `status`
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Status { status, body }
        }
    }

    /// The server asked us to slow down (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            LLMError::from_status(401, "nope".to_string()),
            LLMError::Unauthorized
        ));

        let err = LLMError::from_status(429, "slow down".to_string());
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "model endpoint returned HTTP 429: slow down");

        assert!(!LLMError::from_status(500, String::new()).is_rate_limited());
    }
}
