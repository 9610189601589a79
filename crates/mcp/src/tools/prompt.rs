// Prompt formatting tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_array, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use assistant_core::{build_prompt, PromptConfig, PromptSection};
use serde::Deserialize;

pub const OPTIMIZE_PROMPT: &str = "optimize_prompt";

/// Builds the final prompt once the client has gathered all context.
pub struct OptimizePromptTool {
    config: PromptConfig,
}

impl OptimizePromptTool {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }
}

impl Default for OptimizePromptTool {
    fn default() -> Self {
        Self::new(PromptConfig::default())
    }
}

#[derive(Debug, Deserialize)]
struct OptimizePromptArgs {
    sections: Vec<PromptSection>,
    #[serde(default)]
    instructions: Option<String>,
}

#[async_trait::async_trait]
impl Tool for OptimizePromptTool {
    fn schema(&self) -> ToolSchema {
        let section = json_schema_object(
            serde_json::json!({
                "title": json_schema_string("Section heading"),
                "content": json_schema_string("Section body")
            }),
            vec!["title", "content"],
        );

        ToolSchema {
            name: OPTIMIZE_PROMPT.to_string(),
            description: "Generate the final structured prompt from the collected context sections and instructions. \
                Call this after gathering all necessary context and use the returned prompt as the input for the model."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "sections": json_schema_array(section, "Context sections in the order they should appear"),
                    "instructions": json_schema_string("Instructions appended after the context (optional)")
                }),
                vec!["sections"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: OptimizePromptArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for optimize_prompt")?;

        let prompt = build_prompt(&self.config, &args.sections, args.instructions.as_deref());
        CallToolResult::json(&prompt).context("Failed to serialize prompt")
    }
}
