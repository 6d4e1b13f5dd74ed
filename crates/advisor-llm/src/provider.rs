//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for generation model providers
///
/// Implementations hand a conversation to a model service (an OpenAI-compatible
/// endpoint, a local llama.cpp server, ...) and return the generated message.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the model
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and sampling parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
