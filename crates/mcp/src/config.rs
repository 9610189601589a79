use anyhow::{Context, Result};
use assistant_core::{AsanaConfig, GitLabConfig, HttpConfig, PromptConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub gitlab: GitLabConfig,
    pub asana: AsanaConfig,
    pub tools: ToolsConfig,
    pub prompt: PromptConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// JSON file with additional tool definitions
    pub definitions_path: Option<PathBuf>,
}

/// Values taken from the command line or the environment. They win over the
/// configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub gitlab_url: Option<String>,
    pub gitlab_token: Option<String>,
    pub asana_token: Option<String>,
    pub asana_workspace: Option<String>,
    pub tools_path: Option<PathBuf>,
}

impl AssistantConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            Self::from_toml(&content).with_context(|| {
                format!("Failed to parse configuration file {}", config_path.display())
            })
        } else {
            tracing::info!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.gitlab_url {
            self.gitlab.api_url = url;
        }
        if let Some(token) = non_empty(overrides.gitlab_token) {
            self.gitlab.token = Some(token);
        }
        if let Some(token) = non_empty(overrides.asana_token) {
            self.asana.token = Some(token);
        }
        if let Some(workspace) = non_empty(overrides.asana_workspace) {
            self.asana.workspace = Some(workspace);
        }
        if let Some(path) = overrides.tools_path {
            self.tools.definitions_path = Some(path);
        }
    }

    pub fn has_gitlab_token(&self) -> bool {
        self.gitlab.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
