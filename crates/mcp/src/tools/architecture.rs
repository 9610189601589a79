// Architecture document tool backed by the GitLab repository files API

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, Tool};
use anyhow::{Context, Result};
use assistant_core::GitLabClient;

pub const ARCHITECTURE_INFO: &str = "architecture_info";

/// Tool returning the project's architecture document
pub struct ArchitectureInfoTool {
    client: GitLabClient,
}

impl ArchitectureInfoTool {
    pub fn new(client: GitLabClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ArchitectureInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ARCHITECTURE_INFO.to_string(),
            description: "Obtaining mandatory information about the architecture of frontend application projects".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let config = self.client.config();

        match self.client.architecture_document().await {
            Ok(document) => {
                tracing::debug!(
                    project = %config.project,
                    file = %config.file_path,
                    bytes = document.len(),
                    "Fetched architecture document"
                );
                CallToolResult::json(&document).context("Failed to serialize architecture document")
            }
            Err(e) => {
                tracing::warn!(project = %config.project, file = %config.file_path, status = ?e.status(), "Failed to load architecture document: {}", e);
                Ok(CallToolResult::error(format!(
                    "Failed to load {} from project {}: {}",
                    config.file_path, config.project, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::GitLabConfig;
    use base64::Engine;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(server: &MockServer) -> ArchitectureInfoTool {
        let config = GitLabConfig {
            api_url: format!("{}/api/v4", server.uri()),
            token: Some("glpat-test".to_string()),
            git_ref: "develop".to_string(),
            ..Default::default()
        };
        ArchitectureInfoTool::new(GitLabClient::new(config, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_returns_document_as_json_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("ref", "develop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file_path": "doc/development/architecture.md",
                "encoding": "base64",
                "content": base64::engine::general_purpose::STANDARD.encode("# Layers\napp, pages")
            })))
            .mount(&server)
            .await;

        let result = tool(&server).execute(serde_json::json!({})).await.unwrap();
        assert!(!result.is_error());
        assert_eq!(result.content[0].as_text(), "\"# Layers\\napp, pages\"");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_tool_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "401 Unauthorized"})))
            .mount(&server)
            .await;

        let result = tool(&server).execute(serde_json::json!({})).await.unwrap();
        assert!(result.is_error());
        assert!(result.content[0].as_text().contains("401 Unauthorized"));
    }
}
