//! Error types for the briefing pipeline

use thiserror::Error;

/// Briefing pipeline errors
#[derive(Debug, Error)]
pub enum StockError {
    /// The request itself is unusable (no symbols, empty question, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Fetching data for one symbol failed; the whole request is aborted
    #[error("Failed to fetch data for {symbol}: {reason}")]
    FetchFailed { symbol: String, reason: String },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Prompt template is malformed
    #[error("Prompt assembly error: {0}")]
    AssemblyError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The generation model call failed
    #[error("Generation error: {0}")]
    GenerationError(#[from] advisor_llm::LLMError),
}

impl StockError {
    /// Wrap any collaborator failure as a fetch failure for `symbol`
    pub fn fetch_failed(symbol: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::FetchFailed {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for briefing operations
pub type Result<T> = std::result::Result<T, StockError>;
