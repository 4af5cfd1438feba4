//! Generic-task handler: fallback + compound-request decomposition.
//!
//! Never calls domain tools itself.  Single-clause messages that no
//! domain handler claimed get a guidance reply; compound messages are
//! split into sub-clauses and each clause is re-submitted to the router
//! as an independent top-level request.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RoutingConfig;
use crate::router::RouteContext;

use super::{Capability, Handler, HandlerError, Message, Outcome};

/// Constant fallback score; only wins when no domain handler scores
/// higher, and the task handler is registered last so it loses ties.
pub const BASELINE_SCORE: f64 = 0.1;

/// Score for compound messages; above [`super::DOMAIN_SCORE_CAP`] so
/// decomposition always beats the domain handlers.
pub const COMPOUND_SCORE: f64 = 0.95;

/// Fixed clause-splitting rule: "and then" first (so it isn't eaten by
/// the bare "and"), then ";", then "and".
static SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+then\s+|\s*;\s*|\s+and\s+").expect("split regex"));

static CAPABILITY: Capability = Capability {
    keywords: &["and then", "and", ";", "help", "please"],
    tools: &[],
};

/// Split a message into trimmed, non-empty sub-clauses.
pub fn split_clauses(text: &str) -> Vec<&str> {
    SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub struct TaskHandler {
    max_subtasks: usize,
    max_depth: usize,
}

impl TaskHandler {
    pub fn new(cfg: &RoutingConfig) -> Self {
        Self {
            max_subtasks: cfg.max_subtasks,
            max_depth: cfg.max_depth,
        }
    }

    /// Reply for single-clause messages no domain handler claimed:
    /// name what the registered handlers can do.
    fn guidance(&self, ctx: &RouteContext<'_>) -> Outcome {
        let domains: Vec<&str> = ctx
            .router()
            .handlers()
            .iter()
            .map(|h| h.name())
            .filter(|n| *n != "task")
            .collect();
        Outcome {
            summary: format!(
                "I can route requests to these domains: {}. Try \"Calculate 15 + 27\" \
                 or \"Analyze the sentiment of: I love sunny days!\"",
                domains.join(", ")
            ),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Handler for TaskHandler {
    fn name(&self) -> &'static str {
        "task"
    }

    fn capability(&self) -> &Capability {
        &CAPABILITY
    }

    fn score(&self, msg: &Message) -> f64 {
        if split_clauses(&msg.text).len() >= 2 {
            COMPOUND_SCORE
        } else {
            BASELINE_SCORE
        }
    }

    async fn handle(
        &self,
        msg: &Message,
        ctx: &RouteContext<'_>,
    ) -> Result<Outcome, HandlerError> {
        let clauses = split_clauses(&msg.text);

        if clauses.len() > self.max_subtasks {
            return Err(HandlerError::TooManySubtasks {
                count: clauses.len(),
                limit: self.max_subtasks,
            });
        }

        if clauses.len() <= 1 {
            return Ok(self.guidance(ctx));
        }

        // Recursion bound: each nesting level adds one; a clause that
        // still decomposes at the bound is rejected, not expanded.
        if ctx.depth >= self.max_depth {
            return Err(HandlerError::TooManySubtasks {
                count: ctx.depth + clauses.len(),
                limit: self.max_depth,
            });
        }

        tracing::debug!(
            clauses = clauses.len(),
            depth = ctx.depth,
            "decomposing compound request"
        );

        let mut subtasks = Vec::with_capacity(clauses.len());
        let mut parts = Vec::with_capacity(clauses.len());
        for (i, clause) in clauses.iter().enumerate() {
            let sub = Message {
                text: clause.to_string(),
                meta: msg.meta.clone(),
            };
            let envelope = ctx.router().route_depth(&sub, ctx.depth + 1).await;
            parts.push(match envelope.summary() {
                Some(s) => format!("{}. {s}", i + 1),
                None => format!(
                    "{}. failed: {}",
                    i + 1,
                    envelope.error_message().unwrap_or("unknown error")
                ),
            });
            subtasks.push(envelope);
        }

        Ok(Outcome {
            summary: parts.join("\n"),
            tool_calls: Vec::new(),
            subtasks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_and_then_over_and() {
        let clauses =
            split_clauses("Help me solve 2x + 5 = 15 and then count the words in the solution");
        assert_eq!(
            clauses,
            vec![
                "Help me solve 2x + 5 = 15",
                "count the words in the solution"
            ]
        );
    }

    #[test]
    fn split_handles_semicolons_and_bare_and() {
        assert_eq!(split_clauses("a; b and c"), vec!["a", "b", "c"]);
        assert_eq!(split_clauses("just one thing"), vec!["just one thing"]);
    }

    #[test]
    fn compound_messages_score_above_domain_cap() {
        let h = TaskHandler::new(&RoutingConfig::default());
        assert_eq!(
            h.score(&Message::new("solve this and then count that")),
            COMPOUND_SCORE
        );
        assert_eq!(h.score(&Message::new("hello there")), BASELINE_SCORE);
    }
}
