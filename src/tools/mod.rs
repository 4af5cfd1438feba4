//! Tool library and metadata registry.
//!
//! Every tool is a pure, deterministic function over JSON arguments:
//! no I/O, no shared state, independently callable.  A **tool metadata
//! registry** tracks each tool's name, description, and JSON-Schema for
//! its arguments.  Call [`init()`] at startup to register the builtins;
//! use [`list_tools()`] to retrieve the catalogue (e.g. for
//! `GET /api/tools`) and [`call_tool()`] to dispatch by name.

pub mod builtins;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Mutex;
use thiserror::Error;

// Re-export the typed tool functions so callers (and tests) can reach
// them without going through JSON dispatch.
pub use builtins::math::{add, divide, multiply, power, solve_linear, sqrt, subtract};
pub use builtins::text::{
    char_count, extract_numbers, sentiment, summarize, word_count, Sentiment, SentimentLabel,
};

/// Domain violations a tool can report.  These are deterministic content
/// errors: re-invoking with the same input reproduces the same error,
/// so there is no retry policy anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("degenerate equation: coefficient of x is zero")]
    DegenerateEquation,
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// Metadata describing a registered tool.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolMeta {
    /// Short machine-friendly name (e.g. `"solve_linear"`).
    pub name: String,
    /// Human-readable one-liner describing what the tool does.
    pub description: String,
    /// JSON Schema object describing the expected `args` value.
    pub args_schema: Value,
}

/// Dispatch function tools register alongside their metadata.
pub type ToolFn = fn(&Value) -> Result<Value, ToolError>;

struct ToolEntry {
    meta: ToolMeta,
    handler: ToolFn,
}

/// Global tool registry.
static REGISTRY: Lazy<Mutex<Vec<ToolEntry>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Register a tool in the global registry.
///
/// Duplicate names are silently ignored (first-registration wins), which
/// makes repeated [`init()`] calls idempotent.
pub fn register_tool(meta: ToolMeta, handler: ToolFn) {
    let mut reg = REGISTRY.lock().expect("tool registry poisoned");
    if reg.iter().any(|e| e.meta.name == meta.name) {
        return;
    }
    reg.push(ToolEntry { meta, handler });
}

/// Return metadata for every registered tool.
pub fn list_tools() -> Vec<ToolMeta> {
    REGISTRY
        .lock()
        .expect("tool registry poisoned")
        .iter()
        .map(|e| e.meta.clone())
        .collect()
}

/// Check whether a tool with the given name is registered.
pub fn has_tool(name: &str) -> bool {
    REGISTRY
        .lock()
        .expect("tool registry poisoned")
        .iter()
        .any(|e| e.meta.name == name)
}

/// Call a tool by name with JSON arguments.
///
/// This is the entry point handlers use; going through it (rather than
/// the typed functions) is what produces the per-call invocation record
/// in the response payload.
pub fn call_tool(name: &str, args: &Value) -> Result<Value, ToolError> {
    let handler = {
        let reg = REGISTRY.lock().expect("tool registry poisoned");
        reg.iter().find(|e| e.meta.name == name).map(|e| e.handler)
    };
    match handler {
        Some(h) => h(args),
        None => Err(ToolError::UnknownTool(name.to_string())),
    }
}

/// Extract a required `f64` argument from a JSON object.
pub(crate) fn require_f64(args: &Value, key: &'static str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or(ToolError::MissingArgument(key))
}

/// Extract a required string argument from a JSON object.
pub(crate) fn require_str<'a>(args: &'a Value, key: &'static str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArgument(key))
}

/// Module initialization (called from main and from `Router::new`).
///
/// Registers all built-in tools in the metadata registry.
pub fn init() {
    builtins::math::register();
    builtins::text::register();

    tracing::debug!(total = list_tools().len(), "tool registry loaded");
}
