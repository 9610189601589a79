//! Final prompt assembly from collected context sections.

use crate::config::PromptConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSection {
    pub title: String,
    pub content: String,
}

impl PromptSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Render the prompt: preamble, each section under a `=== title ===`
/// banner, then the instructions or the closing line.
pub fn build_prompt(
    config: &PromptConfig,
    sections: &[PromptSection],
    instructions: Option<&str>,
) -> String {
    let mut prompt = format!("{}\n\n", config.preamble);

    for section in sections {
        prompt.push_str(&format!("=== {} ===\n{}\n\n", section.title, section.content));
    }

    match instructions.filter(|i| !i.is_empty()) {
        Some(instructions) => prompt.push_str(&format!("Instructions:\n{}\n", instructions)),
        None => prompt.push_str(&config.closing),
    }

    prompt
}
