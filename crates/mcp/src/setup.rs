// Tool registry assembly from configuration

use crate::config::AssistantConfig;
use crate::tools::{
    ArchitectureInfoTool, CatalogTool, OptimizePromptTool, SearchTasksTool, ToolRegistry,
    ARCHITECTURE_INFO,
};
use anyhow::{Context, Result};
use assistant_core::{GitLabClient, TaskSource, ToolCatalog};
use std::sync::Arc;

/// Register the built-in tools, then the catalog tools (which may replace a
/// built-in of the same name).
pub fn build_registry(config: &AssistantConfig) -> Result<ToolRegistry> {
    let timeout = config.http.timeout();
    let mut registry = ToolRegistry::new();

    if config.has_gitlab_token() {
        let client = GitLabClient::new(config.gitlab.clone(), timeout)
            .context("Failed to create GitLab client")?;
        registry.register(Arc::new(ArchitectureInfoTool::new(client)));
    } else {
        tracing::warn!(
            "GITLAB_PERSONAL_ACCESS_TOKEN is not set, {} is disabled",
            ARCHITECTURE_INFO
        );
    }

    let source = TaskSource::from_config(&config.asana, timeout)
        .context("Failed to create task source")?;
    tracing::info!("Tasks are read from {}", source.describe());
    registry.register(Arc::new(SearchTasksTool::new(source)));

    registry.register(Arc::new(OptimizePromptTool::new(config.prompt.clone())));

    if let Some(path) = &config.tools.definitions_path {
        let catalog = ToolCatalog::load(path)
            .with_context(|| format!("Failed to load tool definitions from {}", path.display()))?;
        tracing::info!(
            "Loaded {} tool definitions from {}",
            catalog.len(),
            path.display()
        );
        for entry in catalog {
            registry.register(Arc::new(CatalogTool::new(entry)));
        }
    }

    tracing::info!("Registered {} tools", registry.len());
    Ok(registry)
}
