// Task search tool backed by Asana or a local task export

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use assistant_core::TaskSource;
use serde::Deserialize;

pub const SEARCH_TASKS: &str = "search_tasks";

const DESCRIPTION: &str = "Before executing this function, you must retrieve the project architecture information from 'architecture_info'. \
This is mandatory information and you must respect it.
After that you need to find the task you are talking about, analyze what needs to be done and implement it in the project according to the architecture and requirements.
You don't need to invent anything additional from yourself, just what is required";

/// Tool to look up the task the user refers to
pub struct SearchTasksTool {
    source: TaskSource,
}

impl SearchTasksTool {
    pub fn new(source: TaskSource) -> Self {
        Self { source }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchTasksArgs {
    #[serde(default)]
    query: Option<String>,
}

#[async_trait::async_trait]
impl Tool for SearchTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: SEARCH_TASKS.to_string(),
            description: DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Text identifying the task (id, title or keywords)")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchTasksArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_tasks")?;

        match self.source.search(args.query.as_deref()).await {
            Ok(found) => CallToolResult::json(&found).context("Failed to serialize tasks"),
            Err(e) => {
                tracing::warn!(source = %self.source.describe(), status = ?e.status(), "Task search failed: {}", e);
                Ok(CallToolResult::error(format!("Failed to get tasks: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_tool(temp_dir: &TempDir, text: &str) -> SearchTasksTool {
        let path = temp_dir.path().join("asana.txt");
        std::fs::write(&path, text).unwrap();
        SearchTasksTool::new(TaskSource::Export(path))
    }

    #[tokio::test]
    async fn test_search_export() {
        let temp_dir = TempDir::new().unwrap();
        let tool = export_tool(&temp_dir, "FE-1 Login page\nFE-2 Cart badge");

        let result = tool
            .execute(serde_json::json!({"query": "cart"}))
            .await
            .unwrap();
        assert_eq!(result.content[0].as_text(), "\"FE-2 Cart badge\"");

        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert_eq!(
            result.content[0].as_text(),
            "\"FE-1 Login page\\nFE-2 Cart badge\""
        );
    }

    #[tokio::test]
    async fn test_missing_export_is_tool_error() {
        let temp_dir = TempDir::new().unwrap();
        let tool = SearchTasksTool::new(TaskSource::Export(temp_dir.path().join("none.txt")));

        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(result.is_error());
        assert!(result.content[0].as_text().starts_with("Error: Failed to get tasks"));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let tool = export_tool(&temp_dir, "");

        let err = tool
            .execute(serde_json::json!({"query": 5}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("search_tasks"));
    }
}
