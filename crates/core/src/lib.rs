// Upstream clients and shared building blocks for the assistant MCP server

pub mod catalog;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod http;
pub mod prompt;
pub mod tasks;

pub use catalog::{CatalogEntry, Plugin, ToolCatalog};
pub use config::{AsanaConfig, GitLabConfig, HttpConfig, PromptConfig};
pub use error::{AssistantError, AssistantResult};
pub use gitlab::GitLabClient;
pub use prompt::{build_prompt, PromptSection};
pub use tasks::{TaskSearchResult, TaskSource};
