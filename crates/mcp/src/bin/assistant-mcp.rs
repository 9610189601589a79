// Assistant MCP server binary

use anyhow::Result;
use assistant_mcp::config::{AssistantConfig, ConfigOverrides};
use assistant_mcp::protocol::ServerInfo;
use assistant_mcp::{build_registry, McpServer};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assistant-mcp")]
#[command(about = "MCP server exposing project architecture, tasks and prompt tools over stdio", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "assistant-mcp.toml")]
    config: PathBuf,

    /// JSON file with additional tool definitions
    #[arg(long, env = "TOOLS_PATH")]
    tools: Option<PathBuf>,

    /// GitLab REST API base URL
    #[arg(long, env = "GITLAB_API_URL")]
    gitlab_url: Option<String>,

    /// GitLab personal access token
    #[arg(long, env = "GITLAB_PERSONAL_ACCESS_TOKEN", hide_env_values = true)]
    gitlab_token: Option<String>,

    /// Asana personal access token
    #[arg(long, env = "ASANA_ACCESS_TOKEN", hide_env_values = true)]
    asana_token: Option<String>,

    /// Asana workspace gid to search tasks in
    #[arg(long, env = "ASANA_WORKSPACE_GID")]
    asana_workspace: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    // stdout carries protocol frames, so logs go to stderr
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "assistant_mcp=info,assistant_core=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    tracing::info!("Assistant MCP Server starting...");

    let mut config = AssistantConfig::load(&args.config)?;
    config.apply_overrides(ConfigOverrides {
        gitlab_url: args.gitlab_url,
        gitlab_token: args.gitlab_token,
        asana_token: args.asana_token,
        asana_workspace: args.asana_workspace,
        tools_path: args.tools,
    });

    let registry = build_registry(&config)?;

    // Start MCP server
    let server = McpServer::new(registry, ServerInfo::default());
    server.start().await?;

    Ok(())
}
