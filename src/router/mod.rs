//! Router: scores a message against every registered handler, selects
//! exactly one, and normalizes its outcome into a response envelope.
//!
//! Handlers are registered in a fixed order (math, text, task); the
//! task handler's constant baseline score plus the first-registered
//! tie-break makes it the deterministic fallback.  Every enumerated
//! handler error is recovered here and rendered as a structured error
//! payload; nothing short of a programming defect reaches the caller
//! as a fault.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handlers::{
    math::MathHandler, task::TaskHandler, text::TextHandler, Handler, HandlerError, Message,
    Outcome,
};
use crate::utils::truncate_str;

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Structured error detail in an error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable kind: `tool_error`, `parse_failure`, or
    /// `too_many_subtasks`.
    pub kind: String,
    pub message: String,
}

/// Uniform success/error wrapper returned for every request.
///
/// Built once per request and discarded after serialization; identical
/// input always yields an identical envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: Status,
    /// Name of the handler that ran.
    pub handler: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl Envelope {
    pub fn success(handler: &str, outcome: Outcome) -> Self {
        Self {
            status: Status::Success,
            handler: handler.to_string(),
            payload: Some(outcome),
            error: None,
        }
    }

    pub fn failure(handler: &str, err: &HandlerError) -> Self {
        Self {
            status: Status::Error,
            handler: handler.to_string(),
            payload: None,
            error: Some(ErrorDetail {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// Summary text of a success envelope.
    pub fn summary(&self) -> Option<&str> {
        self.payload.as_ref().map(|p| p.summary.as_str())
    }

    /// Error message of an error envelope.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Per-call context passed to handlers so the task handler can
/// re-submit sub-clauses through the router.
pub struct RouteContext<'a> {
    router: &'a Router,
    /// Recursion depth; 0 for transport-initiated calls.
    pub depth: usize,
}

impl<'a> RouteContext<'a> {
    pub fn router(&self) -> &'a Router {
        self.router
    }
}

/// The dispatcher: a fixed, ordered list of handler implementations.
pub struct Router {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Router {
    /// Build a router with the standard handler set, registered in
    /// fallback-last order: math, text, task.
    pub fn new(cfg: &Config) -> Self {
        crate::tools::init();
        Self {
            handlers: vec![
                Arc::new(MathHandler),
                Arc::new(TextHandler::new(&cfg.text)),
                Arc::new(TaskHandler::new(&cfg.routing)),
            ],
        }
    }

    /// The registered handlers, in registration order.
    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    /// Route a message: score all handlers, run the best match, wrap
    /// the result.  This is the single entry point the transport layer
    /// calls.
    pub async fn route(&self, msg: &Message) -> Envelope {
        self.route_depth(msg, 0).await
    }

    /// Route at a given recursion depth.  Sub-clauses re-submitted by
    /// the task handler come through here with `depth + 1` and are
    /// independently subject to the one-handler guarantee.
    pub async fn route_depth(&self, msg: &Message, depth: usize) -> Envelope {
        // Strictly-greater comparison keeps the first-registered handler
        // on ties, which is what makes the fallback deterministic.
        let mut best: Option<(&Arc<dyn Handler>, f64)> = None;
        for handler in &self.handlers {
            let score = handler.score(msg).clamp(0.0, 1.0);
            debug!(handler = handler.name(), score, "scored");
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((handler, score));
            }
        }
        let (handler, score) = best.expect("router has no registered handlers");

        info!(
            handler = handler.name(),
            score,
            depth,
            text = %truncate_str(&msg.text, 80),
            "routing message"
        );

        let ctx = RouteContext { router: self, depth };
        match handler.handle(msg, &ctx).await {
            Ok(outcome) => Envelope::success(handler.name(), outcome),
            Err(err) => {
                warn!(
                    handler = handler.name(),
                    kind = err.kind(),
                    error = %err,
                    "handler reported error"
                );
                Envelope::failure(handler.name(), &err)
            }
        }
    }
}
