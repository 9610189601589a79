//! Tool definitions loaded from a JSON file and bound to generic plugins.
//!
//! ```json
//! { "tools": [ { "name": "frontend_rules",
//!                "description": "Coding rules for the frontend team",
//!                "inputSchema": {},
//!                "plugin": { "type": "file", "args": { "path": "rules.md" } } } ] }
//! ```

use crate::error::{AssistantError, AssistantResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    tools: Option<Vec<RawTool>>,
}

#[derive(Debug, Deserialize)]
struct RawTool {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "inputSchema")]
    input_schema: Value,
    plugin: RawPlugin,
}

#[derive(Debug, Deserialize)]
struct RawPlugin {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    args: HashMap<String, String>,
}

/// Generic handler a catalog tool is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plugin {
    /// Return the contents of a local file.
    File { path: PathBuf },
}

impl Plugin {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
        }
    }

    pub async fn run(&self) -> AssistantResult<String> {
        match self {
            Self::File { path } => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AssistantError::io(path, e)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub plugin: Plugin,
}

/// Ordered set of tool definitions with unique names.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    pub fn load(path: &Path) -> AssistantResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| AssistantError::io(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&raw, base_dir)
    }

    /// Parse a catalog; relative plugin paths resolve against `base_dir`.
    pub fn from_json(raw: &str, base_dir: &Path) -> AssistantResult<Self> {
        let catalog: RawCatalog = serde_json::from_str(raw)
            .map_err(|e| AssistantError::Catalog(format!("Invalid tool definitions: {}", e)))?;

        let mut entries: Vec<CatalogEntry> = Vec::new();
        for tool in catalog.tools.unwrap_or_default() {
            let entry = resolve_tool(tool, base_dir)?;
            if let Some(pos) = entries.iter().position(|e| e.name == entry.name) {
                warn!(tool = %entry.name, "Duplicate tool definition, keeping the later one");
                entries.remove(pos);
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ToolCatalog {
    type Item = CatalogEntry;
    type IntoIter = std::vec::IntoIter<CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn resolve_tool(tool: RawTool, base_dir: &Path) -> AssistantResult<CatalogEntry> {
    if tool.name.trim().is_empty() {
        return Err(AssistantError::Catalog("Tool name must not be empty".to_string()));
    }

    let input_schema = normalize_input_schema(tool.input_schema).ok_or_else(|| {
        AssistantError::Catalog(format!(
            "Tool {}: inputSchema must be an object",
            tool.name
        ))
    })?;

    let plugin = match tool.plugin.kind.as_str() {
        "file" => {
            let path = tool.plugin.args.get("path").ok_or_else(|| {
                AssistantError::Catalog(format!("Tool {}: file plugin requires args.path", tool.name))
            })?;
            Plugin::File {
                path: base_dir.join(path),
            }
        }
        other => {
            return Err(AssistantError::Catalog(format!(
                "Tool {}: unknown plugin type {}",
                tool.name, other
            )))
        }
    };

    Ok(CatalogEntry {
        name: tool.name,
        description: tool.description,
        input_schema,
        plugin,
    })
}

/// A schema carrying `"type"` is kept as is; any other object is read as a
/// properties map and wrapped into an object schema.
pub fn normalize_input_schema(schema: Value) -> Option<Value> {
    match schema {
        Value::Null => Some(object_schema(Map::new())),
        Value::Object(map) if map.contains_key("type") => Some(Value::Object(map)),
        Value::Object(map) => Some(object_schema(map)),
        _ => None,
    }
}

fn object_schema(properties: Map<String, Value>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_input_schema() {
        assert_eq!(
            normalize_input_schema(Value::Null).unwrap(),
            json!({"type": "object", "properties": {}, "required": []})
        );

        let props = json!({"topic": {"type": "string"}});
        assert_eq!(
            normalize_input_schema(props.clone()).unwrap(),
            json!({"type": "object", "properties": props, "required": []})
        );

        let full = json!({"type": "object", "properties": {}, "required": ["x"]});
        assert_eq!(normalize_input_schema(full.clone()).unwrap(), full);

        assert!(normalize_input_schema(json!(["x"])).is_none());
    }

    #[test]
    fn test_from_json() {
        let raw = r#"{
            "tools": [
                {
                    "name": "frontend_rules",
                    "description": "Coding rules",
                    "inputSchema": {},
                    "plugin": { "type": "file", "args": { "path": "rules.md" } }
                },
                {
                    "name": "glossary",
                    "description": "Domain glossary",
                    "plugin": { "type": "file", "args": { "path": "/abs/glossary.md" } }
                }
            ]
        }"#;

        let catalog = ToolCatalog::from_json(raw, Path::new("/etc/assistant")).unwrap();
        assert_eq!(catalog.len(), 2);

        let rules = catalog.get("frontend_rules").unwrap();
        assert_eq!(
            rules.plugin,
            Plugin::File {
                path: PathBuf::from("/etc/assistant/rules.md")
            }
        );
        assert_eq!(rules.input_schema["type"], "object");

        let glossary = catalog.get("glossary").unwrap();
        assert_eq!(
            glossary.plugin,
            Plugin::File {
                path: PathBuf::from("/abs/glossary.md")
            }
        );
    }

    #[test]
    fn test_missing_tools_key() {
        let catalog = ToolCatalog::from_json("{}", Path::new(".")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_names_keep_later() {
        let raw = r#"{"tools": [
            {"name": "a", "description": "first", "plugin": {"type": "file", "args": {"path": "1"}}},
            {"name": "b", "description": "other", "plugin": {"type": "file", "args": {"path": "2"}}},
            {"name": "a", "description": "second", "plugin": {"type": "file", "args": {"path": "3"}}}
        ]}"#;

        let catalog = ToolCatalog::from_json(raw, Path::new("")).unwrap();
        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(catalog.get("a").unwrap().description, "second");
    }

    #[test]
    fn test_invalid_plugins() {
        let unknown = r#"{"tools": [{"name": "x", "plugin": {"type": "shell", "args": {}}}]}"#;
        let err = ToolCatalog::from_json(unknown, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("unknown plugin type shell"));

        let no_path = r#"{"tools": [{"name": "y", "plugin": {"type": "file"}}]}"#;
        let err = ToolCatalog::from_json(no_path, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("Tool y"));

        let bad_schema =
            r#"{"tools": [{"name": "z", "inputSchema": 3, "plugin": {"type": "file", "args": {"path": "p"}}}]}"#;
        let err = ToolCatalog::from_json(bad_schema, Path::new(".")).unwrap_err();
        assert!(matches!(err, AssistantError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_load_and_run_file_plugin() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("rules.md"), "Use named exports.").unwrap();
        let definitions = temp_dir.path().join("tools.json");
        std::fs::write(
            &definitions,
            r#"{"tools": [{"name": "rules", "description": "Rules",
                "plugin": {"type": "file", "args": {"path": "rules.md"}}}]}"#,
        )
        .unwrap();

        let catalog = ToolCatalog::load(&definitions).unwrap();
        let entry = catalog.get("rules").unwrap();
        assert_eq!(entry.plugin.kind(), "file");
        assert_eq!(entry.plugin.run().await.unwrap(), "Use named exports.");
    }

    #[tokio::test]
    async fn test_file_plugin_missing_file() {
        let plugin = Plugin::File {
            path: PathBuf::from("/nonexistent/definitely/missing.md"),
        };
        assert!(matches!(plugin.run().await, Err(AssistantError::Io { .. })));
    }
}
