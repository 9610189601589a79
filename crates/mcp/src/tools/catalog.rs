// Tools declared in the JSON tool catalog

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::Tool;
use anyhow::{Context, Result};
use assistant_core::CatalogEntry;

/// Catalog-defined tool dispatching to its plugin
pub struct CatalogTool {
    entry: CatalogEntry,
}

impl CatalogTool {
    pub fn new(entry: CatalogEntry) -> Self {
        Self { entry }
    }
}

#[async_trait::async_trait]
impl Tool for CatalogTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.entry.name.clone(),
            description: self.entry.description.clone(),
            input_schema: self.entry.input_schema.clone(),
        }
    }

    // Arguments are accepted but unused: plugins are fully configured in the catalog.
    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        match self.entry.plugin.run().await {
            Ok(output) => CallToolResult::json(&output)
                .with_context(|| format!("Failed to serialize output of {}", self.entry.name)),
            Err(e) => {
                tracing::warn!(tool = %self.entry.name, plugin = self.entry.plugin.kind(), "Plugin failed: {}", e);
                Ok(CallToolResult::error(e.to_string()))
            }
        }
    }
}
