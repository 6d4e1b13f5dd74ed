//! One generation call: the conversation in, the assistant reply out

use crate::Message;
use serde::{Deserialize, Serialize};

/// Output cap used when the caller does not set one
pub const DEFAULT_MAX_TOKENS: usize = 256;

/// A conversation plus the limits for generating its continuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    /// System message first, then the user prompt
    pub messages: Vec<Message>,
    pub max_tokens: usize,
    /// Generation ends at the first of these; `None` means model default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: DEFAULT_MAX_TOKENS,
            stop_sequences: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// An empty list clears the stop sequences
    pub fn with_stop_sequences<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sequences: Vec<String> = sequences.into_iter().map(Into::into).collect();
        self.stop_sequences = (!sequences.is_empty()).then_some(sequences);
        self
    }
}

/// The assistant reply and how generation ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// Cut off by `max_tokens`
    MaxTokens,
    StopSequence,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
