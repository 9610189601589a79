//! Configuration types for the upstream clients and the prompt formatter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// GitLab repository holding the architecture document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// Base URL of the GitLab REST API (v4).
    pub api_url: String,
    /// Personal access token sent as a bearer token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Numeric project id or `group/name` path.
    pub project: String,
    /// Repository path of the architecture document.
    pub file_path: String,
    /// Branch, tag or commit to read from.
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_url: "https://gitlab.com/api/v4".to_string(),
            token: None,
            project: "254".to_string(),
            file_path: "doc/development/architecture.md".to_string(),
            git_ref: "main".to_string(),
        }
    }
}

/// Asana workspace searched for tasks, with a local export as fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsanaConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Workspace gid used for task search.
    pub workspace: Option<String>,
    /// Plain-text task export read when the API is not configured.
    pub export_path: PathBuf,
}

impl AsanaConfig {
    /// The API is used only when both a token and a workspace are present.
    pub fn api_enabled(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
            && self.workspace.as_deref().is_some_and(|w| !w.is_empty())
    }
}

impl Default for AsanaConfig {
    fn default() -> Self {
        Self {
            api_url: "https://app.asana.com/api/1.0".to_string(),
            token: None,
            workspace: None,
            export_path: PathBuf::from("./public/asana.txt"),
        }
    }
}

/// Fixed text surrounding the sections of a formatted prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub preamble: String,
    /// Used when the caller supplies no instructions.
    pub closing: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            preamble: "You are a developer assistant. Here is the context:".to_string(),
            closing: "Complete the task following the context above.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitlab_defaults() {
        let config = GitLabConfig::default();
        assert_eq!(config.api_url, "https://gitlab.com/api/v4");
        assert_eq!(config.project, "254");
        assert_eq!(config.file_path, "doc/development/architecture.md");
        assert_eq!(config.git_ref, "main");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_asana_api_enabled() {
        let mut config = AsanaConfig::default();
        assert!(!config.api_enabled());

        config.token = Some("tok".to_string());
        assert!(!config.api_enabled());

        config.workspace = Some(String::new());
        assert!(!config.api_enabled());

        config.workspace = Some("1200".to_string());
        assert!(config.api_enabled());
    }

    #[test]
    fn test_http_timeout() {
        assert_eq!(HttpConfig::default().timeout(), Duration::from_secs(30));
    }
}
