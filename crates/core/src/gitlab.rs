//! GitLab repository files API client.

use crate::config::GitLabConfig;
use crate::error::{AssistantError, AssistantResult};
use crate::http::ApiTransport;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A file as returned by `GET /projects/:id/repository/files/:file_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryFile {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub last_commit_id: Option<String>,
}

impl RepositoryFile {
    /// Decode the base64 `content` field into UTF-8 text.
    pub fn decoded(&self) -> AssistantResult<String> {
        let content = self.content.as_deref().ok_or_else(|| {
            AssistantError::Decode(format!("{} has no content field", self.file_path))
        })?;

        if let Some(encoding) = self.encoding.as_deref() {
            if encoding == "text" {
                return Ok(content.to_string());
            }
            if encoding != "base64" {
                return Err(AssistantError::Decode(format!(
                    "Unsupported encoding: {}",
                    encoding
                )));
            }
        }

        // GitLab may wrap long base64 payloads.
        let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| AssistantError::Decode(format!("Invalid base64 content: {}", e)))?;

        String::from_utf8(bytes)
            .map_err(|e| AssistantError::Decode(format!("Content is not valid UTF-8: {}", e)))
    }
}

/// Client for reading repository files.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    transport: ApiTransport,
    config: GitLabConfig,
}

impl GitLabClient {
    pub fn new(config: GitLabConfig, timeout: Duration) -> AssistantResult<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AssistantError::Config("GitLab personal access token is not set".to_string())
            })?;

        let transport = ApiTransport::new(&config.api_url, token, timeout)?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &GitLabConfig {
        &self.config
    }

    /// Fetch a file's metadata and encoded content.
    pub async fn file(
        &self,
        project: &str,
        file_path: &str,
        git_ref: &str,
    ) -> AssistantResult<RepositoryFile> {
        let url = self
            .transport
            .endpoint(&["projects", project, "repository", "files", file_path])?;
        debug!(project, file_path, git_ref, "Fetching repository file");

        self.transport.get_json(url, &[("ref", git_ref)]).await
    }

    /// Fetch and decode the configured architecture document.
    pub async fn architecture_document(&self) -> AssistantResult<String> {
        let file = self
            .file(
                &self.config.project,
                &self.config.file_path,
                &self.config.git_ref,
            )
            .await?;
        file.decoded()
    }
}
