pub mod architecture;
pub mod catalog;
pub mod prompt;
pub mod tasks;
mod registry;

pub use architecture::{ArchitectureInfoTool, ARCHITECTURE_INFO};
pub use catalog::CatalogTool;
pub use prompt::{OptimizePromptTool, OPTIMIZE_PROMPT};
pub use tasks::{SearchTasksTool, SEARCH_TASKS};
pub use registry::{
    json_schema_array, json_schema_object, json_schema_string, Tool, ToolRegistry,
};
