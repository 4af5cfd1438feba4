//! Handler contract: scoring + execution over an immutable [`Message`].
//!
//! A handler declares a static [`Capability`] (keyword triggers and the
//! tools it may invoke), scores how well a message matches its domain,
//! and, when selected by the router, extracts parameters from the
//! message text and calls its tools in sequence.  Handlers are
//! stateless; everything a call produces lives in the returned
//! [`Outcome`] and is discarded once the response envelope is built.

pub mod math;
pub mod task;
pub mod text;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::router::{Envelope, RouteContext};
use crate::tools::ToolError;

/// Domain handlers never report full certainty; the cap keeps the task
/// handler's compound-message score (0.95) strictly above them so
/// decomposition always wins for multi-part requests.
pub const DOMAIN_SCORE_CAP: f64 = 0.9;

/// Immutable inbound request.
#[derive(Debug, Clone)]
pub struct Message {
    /// The free-text request.
    pub text: String,
    /// Optional free-form metadata supplied by the transport layer.
    pub meta: HashMap<String, Value>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: HashMap::new(),
        }
    }
}

/// Static capability descriptor, fixed at registration time.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    /// Keyword/pattern triggers the handler scores on.
    pub keywords: &'static [&'static str],
    /// Names of the tools the handler may invoke.
    pub tools: &'static [&'static str],
}

/// Record of one tool call made while handling a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub args: Value,
    pub result: Value,
}

/// Structured result of a successful `handle` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    /// Human-readable phrase describing what was done.
    pub summary: String,
    /// Tool calls made, in invocation order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocation>,
    /// Envelopes of re-routed sub-clauses (task handler only), in
    /// sub-clause order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Envelope>,
}

/// Errors a handler can report.  All variants are recovered at the
/// router boundary and rendered as a structured error envelope; none
/// terminates the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    /// The message matched the handler's domain but no usable
    /// parameters could be extracted from it.
    #[error("could not extract parameters: {0}")]
    ParseFailure(String),
    /// A tool rejected its input.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// Task decomposition exceeded the configured bound.
    #[error("too many subtasks: {count} exceeds limit of {limit}")]
    TooManySubtasks { count: usize, limit: usize },
}

impl HandlerError {
    /// Stable machine-readable error kind for the envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::ParseFailure(_) => "parse_failure",
            HandlerError::Tool(_) => "tool_error",
            HandlerError::TooManySubtasks { .. } => "too_many_subtasks",
        }
    }
}

/// Trait implemented by every registered handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short identifier used in envelopes and logs (e.g. `"math"`).
    fn name(&self) -> &'static str;

    /// Static capability descriptor.
    fn capability(&self) -> &Capability;

    /// Score how well the message matches this handler's domain.
    ///
    /// Pure function of the message; must return a value in `[0, 1]`.
    fn score(&self, msg: &Message) -> f64;

    /// Handle the message: extract parameters, invoke tools, package
    /// an [`Outcome`].
    async fn handle(&self, msg: &Message, ctx: &RouteContext<'_>)
        -> Result<Outcome, HandlerError>;
}

/// Count how many of `keywords` occur in the (already lowercased)
/// message text.
pub(crate) fn keyword_hits(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Call a tool through the registry and append the invocation record.
pub(crate) fn invoke(
    calls: &mut Vec<ToolInvocation>,
    tool: &str,
    args: Value,
) -> Result<Value, HandlerError> {
    let result = crate::tools::call_tool(tool, &args)?;
    calls.push(ToolInvocation {
        tool: tool.to_string(),
        args,
        result: result.clone(),
    });
    Ok(result)
}
