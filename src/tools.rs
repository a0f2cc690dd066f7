//! Tool surface consumed by authoring, validation and transport layers.
//!
//! Every read operation on the index is exposed as a [`Tool`]: a name, a
//! description, a JSON Schema for its parameters, and an `execute` that maps
//! JSON parameters to a JSON result. Callers look tools up in a
//! [`ToolRegistry`] and dispatch through [`ToolRegistry::call`], which
//! validates parameters against the schema first.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ToolRegistry                 │
//! │  search · get_file · get_example · cite      │
//! │  files_with_keyword · list_examples · stats  │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!            ToolContext → Arc<CorpusIndex>
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use corpus_cite::config::Config;
//! use corpus_cite::index::CorpusIndex;
//! use corpus_cite::tools::{ToolContext, ToolRegistry};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::for_root("./corpus");
//! let index = Arc::new(CorpusIndex::initialize(&config)?);
//! let ctx = ToolContext::new(index, config.search.default_limit);
//! let tools = ToolRegistry::with_builtins();
//! let result = tools.call("search", serde_json::json!({ "query": "show if" }), &ctx)?;
//! # Ok(())
//! # }
//! ```

use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::index::CorpusIndex;
use crate::models::IndexedFile;
use crate::search::{Scope, SearchOptions, MAX_RESULTS_CAP};

/// A read-only operation over the corpus index.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use corpus_cite::tools::{Tool, ToolContext};
///
/// pub struct CountExamples;
///
/// impl Tool for CountExamples {
///     fn name(&self) -> &str { "count_examples" }
///     fn description(&self) -> &str { "Count example files" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({ "type": "object", "properties": {} })
///     }
///
///     fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
///         Ok(json!({ "count": ctx.index().all_examples().len() }))
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// Lowercase identifier with underscores (e.g. `"get_file"`).
    fn name(&self) -> &str;

    /// One-line description for discovery.
    fn description(&self) -> &str;

    /// Whether this tool ships with the crate. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema object with `type: "object"`, `properties`, and
    /// optionally `required`.
    fn parameters_schema(&self) -> Value;

    /// Execute with parameters already validated against the schema.
    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Shared state handed to every tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    index: Arc<CorpusIndex>,
    default_limit: usize,
}

impl ToolContext {
    pub fn new(index: Arc<CorpusIndex>, default_limit: usize) -> Self {
        Self {
            index,
            default_limit,
        }
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }
}

/// Tool listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub builtin: bool,
    pub parameters: Value,
}

/// File view returned by lookup tools. Omits the raw line vector.
#[derive(Debug, Serialize)]
struct FileSummary<'a> {
    relative_path: &'a str,
    classification: &'a str,
    line_count: usize,
    metadata: &'a crate::models::FileMetadata,
}

impl<'a> From<&'a IndexedFile> for FileSummary<'a> {
    fn from(f: &'a IndexedFile) -> Self {
        Self {
            relative_path: &f.relative_path,
            classification: f.classification.as_str(),
            line_count: f.line_count(),
            metadata: &f.metadata,
        }
    }
}

fn summaries(files: &[&IndexedFile]) -> Value {
    let list: Vec<FileSummary> = files.iter().map(|f| FileSummary::from(*f)).collect();
    json!(list)
}

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    let value = params[key].as_str().unwrap_or("");
    if value.trim().is_empty() {
        bail!("{} must not be empty", key);
    }
    Ok(value)
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in tools
// ═══════════════════════════════════════════════════════════════════════

pub struct SearchTool;

impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the corpus and return scored line windows"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "max_results": { "type": "integer", "minimum": 1, "maximum": MAX_RESULTS_CAP },
                "scope": {
                    "type": "string",
                    "enum": ["docs", "examples", "docs_and_examples", "all"],
                    "default": "all"
                },
                "file_globs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict to relative paths matching any glob"
                }
            },
            "required": ["query"]
        })
    }

    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = params["query"].as_str().unwrap_or("");
        let scope = match params["scope"].as_str() {
            Some(s) => s.parse::<Scope>()?,
            None => Scope::All,
        };
        let max_results = params["max_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(ctx.default_limit);
        let file_globs = params["file_globs"]
            .as_array()
            .map(|globs| {
                globs
                    .iter()
                    .filter_map(|g| g.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let opts = SearchOptions {
            max_results,
            scope,
            file_globs,
        };
        let results = ctx.index.search(query, &opts)?;
        Ok(json!({ "results": results }))
    }
}

pub struct GetFileTool;

impl Tool for GetFileTool {
    fn name(&self) -> &str {
        "get_file"
    }

    fn description(&self) -> &str {
        "Retrieve a corpus file by relative path"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Path relative to the corpus root" }
            },
            "required": ["path"]
        })
    }

    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let path = required_str(&params, "path")?;
        let file = ctx
            .index
            .get_file(path)
            .ok_or_else(|| anyhow!("file not found: {}", path))?;
        Ok(serde_json::to_value(file)?)
    }
}

pub struct GetExampleTool;

impl Tool for GetExampleTool {
    fn name(&self) -> &str {
        "get_example"
    }

    fn description(&self) -> &str {
        "Retrieve an example file by base name"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "File name without extension" }
            },
            "required": ["name"]
        })
    }

    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let name = required_str(&params, "name")?;
        let file = ctx
            .index
            .get_example_by_name(name)
            .ok_or_else(|| anyhow!("example not found: {}", name))?;
        Ok(serde_json::to_value(file)?)
    }
}

pub struct FilesWithKeywordTool;

impl Tool for FilesWithKeywordTool {
    fn name(&self) -> &str {
        "files_with_keyword"
    }

    fn description(&self) -> &str {
        "List files that use a vocabulary keyword"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keyword": { "type": "string" }
            },
            "required": ["keyword"]
        })
    }

    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let keyword = params["keyword"].as_str().unwrap_or("");
        let files = ctx.index.files_with_keyword(keyword);
        Ok(json!({ "keyword": keyword, "files": summaries(&files) }))
    }
}

pub struct ListExamplesTool;

impl Tool for ListExamplesTool {
    fn name(&self) -> &str {
        "list_examples"
    }

    fn description(&self) -> &str {
        "List every example file with its metadata"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(json!({ "examples": summaries(&ctx.index.all_examples()) }))
    }
}

/// Citation tool. Invalid references come back as `valid: false`.
pub struct CiteTool;

impl Tool for CiteTool {
    fn name(&self) -> &str {
        "cite"
    }

    fn description(&self) -> &str {
        "Create a verified citation for a file line range"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string" },
                "line_start": { "type": "integer", "minimum": 1 },
                "line_end": { "type": "integer", "minimum": 1 },
                "reason": { "type": "string" }
            },
            "required": ["path", "line_start", "line_end"]
        })
    }

    fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let path = params["path"].as_str().unwrap_or("");
        let start = params["line_start"].as_u64().unwrap_or(0) as usize;
        let end = params["line_end"].as_u64().unwrap_or(0) as usize;
        let reason = params["reason"].as_str();

        match ctx.index.create_citation(path, start, end, reason) {
            Ok(citation) => Ok(json!({
                "valid": true,
                "reference": citation.to_string(),
                "citation": citation,
            })),
            Err(e) => Ok(json!({ "valid": false, "reason": e.to_string() })),
        }
    }
}

pub struct StatsTool;

impl Tool for StatsTool {
    fn name(&self) -> &str {
        "stats"
    }

    fn description(&self) -> &str {
        "Report file and keyword counts"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(ctx.index.stats())?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry pre-loaded with every built-in tool.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchTool));
        registry.register(Box::new(GetFileTool));
        registry.register(Box::new(GetExampleTool));
        registry.register(Box::new(FilesWithKeywordTool));
        registry.register(Box::new(ListExamplesTool));
        registry.register(Box::new(CiteTool));
        registry.register(Box::new(StatsTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                builtin: t.is_builtin(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Look up `name`, validate `params`, and execute.
    pub fn call(&self, name: &str, params: Value, ctx: &ToolContext) -> Result<Value> {
        let tool = self
            .find(name)
            .ok_or_else(|| anyhow!("no tool registered with name: {}", name))?;
        let params = validate_params(&tool.parameters_schema(), &params)?;
        tool.execute(params, ctx)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check `params` against a tool schema: required keys, JSON types, enums,
/// and integer bounds. Unknown keys pass through untouched.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => bail!("parameters must be an object, got {}", json_type_name(other)),
    };

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for req_field in &required {
        if !params_obj.contains_key(*req_field) {
            bail!("missing required parameter: {}", req_field);
        }
    }

    for (prop_name, prop_schema) in &properties {
        let Some(value) = params_obj.get(prop_name) else {
            continue;
        };

        if let Some(expected_type) = prop_schema.get("type").and_then(|t| t.as_str()) {
            let type_ok = match expected_type {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !type_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    prop_name,
                    expected_type,
                    json_type_name(value)
                );
            }
        }

        if let Some(enum_values) = prop_schema.get("enum").and_then(|e| e.as_array()) {
            if !enum_values.contains(value) {
                bail!(
                    "parameter '{}' must be one of {}, got {}",
                    prop_name,
                    Value::Array(enum_values.clone()),
                    value
                );
            }
        }

        if let Some(n) = value.as_i64() {
            if let Some(min) = prop_schema.get("minimum").and_then(|m| m.as_i64()) {
                if n < min {
                    bail!("parameter '{}' must be >= {}, got {}", prop_name, min, n);
                }
            }
            if let Some(max) = prop_schema.get("maximum").and_then(|m| m.as_i64()) {
                if n > max {
                    bail!("parameter '{}' must be <= {}, got {}", prop_name, max, n);
                }
            }
        }
    }

    Ok(Value::Object(params_obj))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
