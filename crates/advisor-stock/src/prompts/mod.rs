//! Prompt text and conversation assembly
//!
//! - `system`: fixed system instructions (complex / simple)
//! - `template`: the two-slot user prompt template
//! - `assembler`: builds the system + user [`Conversation`]

mod assembler;
mod system;
mod template;

pub use assembler::{Conversation, PromptAssembler};
pub use system::{COMPLEX_SYSTEM_PROMPT, SIMPLE_SYSTEM_PROMPT, system_prompt};
pub use template::{DEFAULT_PROMPT_FORMAT, DESCRIPTION_TOKEN, PromptTemplate, QUERY_TOKEN};
