//! Task lookup against Asana, or against a local task export.

use crate::config::AsanaConfig;
use crate::error::{AssistantError, AssistantResult};
use crate::http::ApiTransport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const TASK_FIELDS: &str = "name,notes,completed,permalink_url";

/// Task as returned by the Asana search endpoint with [`TASK_FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Outcome of a task search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskSearchResult {
    Tasks(Vec<Task>),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct AsanaClient {
    transport: ApiTransport,
    workspace: String,
}

impl AsanaClient {
    pub fn new(config: &AsanaConfig, timeout: Duration) -> AssistantResult<Self> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| AssistantError::Config("Asana access token is not set".to_string()))?;
        let workspace = config
            .workspace
            .clone()
            .ok_or_else(|| AssistantError::Config("Asana workspace gid is not set".to_string()))?;

        Ok(Self {
            transport: ApiTransport::new(&config.api_url, token, timeout)?,
            workspace,
        })
    }

    /// `GET /workspaces/:gid/tasks/search`
    pub async fn search(&self, text: Option<&str>) -> AssistantResult<Vec<Task>> {
        let url = self
            .transport
            .endpoint(&["workspaces", &self.workspace, "tasks", "search"])?;

        let mut query = vec![("opt_fields", TASK_FIELDS)];
        if let Some(text) = text {
            query.push(("text", text));
        }
        debug!(workspace = %self.workspace, ?text, "Searching tasks");

        let envelope: DataEnvelope<Vec<Task>> = self.transport.get_json(url, &query).await?;
        Ok(envelope.data)
    }
}

/// Where `search_tasks` looks for tasks.
#[derive(Debug, Clone)]
pub enum TaskSource {
    Asana(AsanaClient),
    Export(PathBuf),
}

impl TaskSource {
    pub fn from_config(config: &AsanaConfig, timeout: Duration) -> AssistantResult<Self> {
        if config.api_enabled() {
            Ok(Self::Asana(AsanaClient::new(config, timeout)?))
        } else {
            Ok(Self::Export(config.export_path.clone()))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Asana(client) => format!("asana workspace {}", client.workspace),
            Self::Export(path) => format!("task export {}", path.display()),
        }
    }

    pub async fn search(&self, query: Option<&str>) -> AssistantResult<TaskSearchResult> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        match self {
            Self::Asana(client) => client.search(query).await.map(TaskSearchResult::Tasks),
            Self::Export(path) => {
                let text = read_export(path).await?;
                Ok(TaskSearchResult::Text(filter_export(&text, query)))
            }
        }
    }
}

async fn read_export(path: &Path) -> AssistantResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AssistantError::io(path, e))
}

/// Keep the lines mentioning `query`, or the whole export when none do.
fn filter_export(text: &str, query: Option<&str>) -> String {
    let Some(query) = query else {
        return text.to_string();
    };

    let needle = query.to_lowercase();
    let matching: Vec<&str> = text
        .lines()
        .filter(|line| line.to_lowercase().contains(&needle))
        .collect();

    if matching.is_empty() {
        text.to_string()
    } else {
        matching.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EXPORT: &str = "FE-101 Add login form\nFE-102 Fix header layout\nFE-103 Login redirect";

    #[test]
    fn test_filter_export() {
        assert_eq!(filter_export(EXPORT, None), EXPORT);
        assert_eq!(
            filter_export(EXPORT, Some("LOGIN")),
            "FE-101 Add login form\nFE-103 Login redirect"
        );
        assert_eq!(filter_export(EXPORT, Some("payments")), EXPORT);
    }

    #[test]
    fn test_source_selection() {
        let mut config = AsanaConfig::default();
        let source = TaskSource::from_config(&config, Duration::from_secs(1)).unwrap();
        assert!(matches!(source, TaskSource::Export(_)));

        config.token = Some("tok".to_string());
        config.workspace = Some("42".to_string());
        let source = TaskSource::from_config(&config, Duration::from_secs(1)).unwrap();
        assert!(matches!(source, TaskSource::Asana(_)));
        assert_eq!(source.describe(), "asana workspace 42");
    }

    #[tokio::test]
    async fn test_export_search() {
        let temp_dir = TempDir::new().unwrap();
        let export = temp_dir.path().join("asana.txt");
        std::fs::write(&export, EXPORT).unwrap();

        let source = TaskSource::Export(export);
        let result = source.search(Some("header")).await.unwrap();
        assert_eq!(
            result,
            TaskSearchResult::Text("FE-102 Fix header layout".to_string())
        );

        let result = source.search(Some("   ")).await.unwrap();
        assert_eq!(result, TaskSearchResult::Text(EXPORT.to_string()));
    }

    #[tokio::test]
    async fn test_export_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = TaskSource::Export(temp_dir.path().join("missing.txt"));
        let err = source.search(None).await.unwrap_err();
        assert!(matches!(err, AssistantError::Io { .. }));
    }

    #[tokio::test]
    async fn test_asana_search() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/1.0/workspaces/42/tasks/search"))
            .and(query_param("text", "login"))
            .and(query_param("opt_fields", TASK_FIELDS))
            .and(header("authorization", "Bearer asana-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {
                        "gid": "1001",
                        "name": "Add login form",
                        "notes": "Use the shared form widget",
                        "completed": false,
                        "permalink_url": "https://app.asana.com/0/1/1001"
                    },
                    { "gid": "1002", "name": "Login redirect" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = AsanaConfig {
            api_url: format!("{}/api/1.0", server.uri()),
            token: Some("asana-token".to_string()),
            workspace: Some("42".to_string()),
            ..Default::default()
        };
        let source = TaskSource::from_config(&config, Duration::from_secs(5)).unwrap();

        match source.search(Some("login")).await.unwrap() {
            TaskSearchResult::Tasks(tasks) => {
                assert_eq!(tasks.len(), 2);
                assert_eq!(tasks[0].name, "Add login form");
                assert_eq!(tasks[1].gid, "1002");
                assert!(!tasks[1].completed);
                assert!(tasks[1].notes.is_none());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_asana_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": [{ "message": "Not Authorized" }]
            })))
            .mount(&server)
            .await;

        let config = AsanaConfig {
            api_url: server.uri(),
            token: Some("bad".to_string()),
            workspace: Some("42".to_string()),
            ..Default::default()
        };
        let client = AsanaClient::new(&config, Duration::from_secs(5)).unwrap();
        let err = client.search(None).await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 401): Not Authorized");
    }
}
