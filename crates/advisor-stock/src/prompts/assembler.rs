//! Conversation assembly

use super::system::system_prompt;
use super::template::PromptTemplate;
use crate::error::Result;
use advisor_llm::Message;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// The two-message payload handed to the generation model
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub system: Message,
    pub user: Message,
}

impl Conversation {
    /// Messages in wire order: system, then user
    pub fn into_messages(self) -> Vec<Message> {
        vec![self.system, self.user]
    }

    /// Both contents concatenated, for completion-style models
    pub fn flatten(&self) -> String {
        format!("{}{}", self.system.text(), self.user.text())
    }
}

impl Serialize for Conversation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.system)?;
        seq.serialize_element(&self.user)?;
        seq.end()
    }
}

/// Builds conversations from a question and the stocks briefing
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    template: PromptTemplate,
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom user template; see [`PromptTemplate::parse`]
    pub fn with_template(source: &str) -> Result<Self> {
        Ok(Self {
            template: PromptTemplate::parse(source)?,
        })
    }

    pub fn assemble(&self, question: &str, stocks_text: &str, complex: bool) -> Conversation {
        Conversation {
            system: Message::system(system_prompt(complex)),
            user: Message::user(self.template.render(question, stocks_text)),
        }
    }
}
