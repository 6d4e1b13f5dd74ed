//! Generation model abstraction layer for advisor-rs
//!
//! This crate provides provider-agnostic abstractions for handing a
//! conversation to a text-generation model. It includes:
//!
//! - Message types for the `{role, content}` conversation payload
//! - Completion request/response types
//! - Provider trait for model implementations
//! - An OpenAI-compatible provider (behind the `openai` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
