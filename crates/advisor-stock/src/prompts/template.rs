//! Two-slot user prompt template
//!
//! The template is split once on its token boundaries; rendering joins the
//! literal pieces with the supplied values, so nothing inside a value is ever
//! interpreted.

use crate::error::{Result, StockError};

/// Slot for the client's question
pub const QUERY_TOKEN: &str = "<<<input_text>>>";
/// Slot for the per-stock briefing text
pub const DESCRIPTION_TOKEN: &str = "<<<description>>>";

/// Default user prompt layout
pub const DEFAULT_PROMPT_FORMAT: &str = "Provide a clear response to the following question from one of your clients:
<<<input_text>>>
You also have at your disposal the following information regarding the aforementioned stocks:
<<<description>>>
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Query,
    Description,
}

/// A parsed template with exactly one query slot and one description slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse `source`, which must contain each token exactly once
    pub fn parse(source: &str) -> Result<Self> {
        for token in [QUERY_TOKEN, DESCRIPTION_TOKEN] {
            let count = source.matches(token).count();
            if count != 1 {
                return Err(StockError::AssemblyError(format!(
                    "template must contain {token} exactly once, found {count}"
                )));
            }
        }

        let mut segments = Vec::with_capacity(5);
        let mut rest = source;
        while !rest.is_empty() {
            let next = [
                (rest.find(QUERY_TOKEN), QUERY_TOKEN, Segment::Query),
                (rest.find(DESCRIPTION_TOKEN), DESCRIPTION_TOKEN, Segment::Description),
            ]
            .into_iter()
            .filter_map(|(pos, token, slot)| pos.map(|pos| (pos, token, slot)))
            .min_by_key(|(pos, ..)| *pos);

            match next {
                Some((pos, token, slot)) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(rest[..pos].to_string()));
                    }
                    segments.push(slot);
                    rest = &rest[pos + token.len()..];
                }
                None => {
                    segments.push(Segment::Literal(rest.to_string()));
                    rest = "";
                }
            }
        }

        Ok(Self { segments })
    }

    /// Fill both slots with the given values, verbatim
    pub fn render(&self, question: &str, description: &str) -> String {
        let mut out = String::with_capacity(
            self.literal_len() + question.len() + description.len(),
        );
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Query => out.push_str(question),
                Segment::Description => out.push_str(description),
            }
        }
        out
    }

    fn literal_len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                _ => 0,
            })
            .sum()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Literal(
                    "Provide a clear response to the following question from one of your clients:\n"
                        .to_string(),
                ),
                Segment::Query,
                Segment::Literal(
                    "\nYou also have at your disposal the following information regarding the aforementioned stocks:\n"
                        .to_string(),
                ),
                Segment::Description,
                Segment::Literal("\n".to_string()),
            ],
        }
    }
}
