// MCP (Model Context Protocol) server exposing assistant tools over stdio

pub mod codec;
pub mod config;
pub mod protocol;
pub mod server;
pub mod setup;
pub mod tools;

pub use config::AssistantConfig;
pub use server::McpServer;
pub use setup::build_registry;
