//! Text handler: sentiment, counting, summarization, number extraction.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::config::TextConfig;
use crate::router::RouteContext;
use crate::utils::{fmt_num, truncate_str};

use super::{
    invoke, keyword_hits, Capability, Handler, HandlerError, Message, Outcome, DOMAIN_SCORE_CAP,
};

static CAPABILITY: Capability = Capability {
    keywords: &[
        "sentiment", "analyze", "analyse", "summarize", "summary", "count", "words", "characters",
        "extract", "emotion", "feeling",
    ],
    tools: &[
        "word_count", "char_count", "extract_numbers", "sentiment", "summarize",
    ],
};

/// Multi-word phrasings that are stronger signals than single keywords.
static PHRASES: &[&str] = &[
    "sentiment of", "word count", "character count", "count the words", "how many words",
    "analyze this text", "what is the sentiment",
];

/// Quoted target text, double or single quotes.
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).expect("quote regex"));

/// `… of: <target>` / `… text: <target>` tails.
static OF_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bof\s*:?\s+(.+)$").expect("of-tail regex"));
static TEXT_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\btext\s*:\s*(.+)$").expect("text-tail regex"));

/// Explicit sentence budget for summarize, e.g. "in 2 sentences".
static SENTENCE_BUDGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+sentences?").expect("budget regex"));

pub struct TextHandler {
    summary_max_sentences: usize,
}

impl TextHandler {
    pub fn new(cfg: &TextConfig) -> Self {
        Self {
            summary_max_sentences: cfg.summary_max_sentences,
        }
    }
}

#[async_trait]
impl Handler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn capability(&self) -> &Capability {
        &CAPABILITY
    }

    fn score(&self, msg: &Message) -> f64 {
        let lower = msg.text.to_lowercase();
        let score = 0.25 * keyword_hits(&lower, CAPABILITY.keywords) as f64
            + 0.3 * keyword_hits(&lower, PHRASES) as f64;
        score.min(DOMAIN_SCORE_CAP)
    }

    async fn handle(
        &self,
        msg: &Message,
        _ctx: &RouteContext<'_>,
    ) -> Result<Outcome, HandlerError> {
        let lower = msg.text.to_lowercase();
        let target = extract_target_text(&msg.text);
        if target.trim().is_empty() {
            return Err(HandlerError::ParseFailure(
                "no text to analyze in message".into(),
            ));
        }
        let mut calls = Vec::new();

        if keyword_hits(&lower, &["sentiment", "emotion", "feeling"]) > 0 {
            let result = invoke(&mut calls, "sentiment", json!({ "text": target }))?;
            let label = result["label"].as_str().unwrap_or("unknown").to_string();
            let confidence = result["confidence"].as_f64().unwrap_or_default();
            return Ok(Outcome {
                summary: format!(
                    "The sentiment of \"{}\" is {label} ({:.0}% confidence)",
                    truncate_str(&target, 60),
                    confidence * 100.0
                ),
                tool_calls: calls,
                ..Default::default()
            });
        }

        if keyword_hits(&lower, &["count", "words", "characters", "length"]) > 0 {
            let words = invoke(&mut calls, "word_count", json!({ "text": target }))?;
            let chars = invoke(&mut calls, "char_count", json!({ "text": target }))?;
            return Ok(Outcome {
                summary: format!(
                    "\"{}\" has {} words and {} characters",
                    truncate_str(&target, 60),
                    words["result"],
                    chars["result"]
                ),
                tool_calls: calls,
                ..Default::default()
            });
        }

        if keyword_hits(&lower, &["summarize", "summarise", "summary"]) > 0 {
            let max = SENTENCE_BUDGET_RE
                .captures(&lower)
                .and_then(|c| c[1].parse::<usize>().ok())
                .unwrap_or(self.summary_max_sentences);
            let result = invoke(
                &mut calls,
                "summarize",
                json!({ "text": target, "max_sentences": max }),
            )?;
            let summary_text = result["result"].as_str().unwrap_or_default().to_string();
            return Ok(Outcome {
                summary: format!("Summary: {summary_text}"),
                tool_calls: calls,
                ..Default::default()
            });
        }

        if keyword_hits(&lower, &["extract", "numbers", "number"]) > 0 {
            let result = invoke(&mut calls, "extract_numbers", json!({ "text": target }))?;
            let found: Vec<String> = result["result"]
                .as_array()
                .map(|a| {
                    a.iter()
                        .filter_map(|v| v.as_f64())
                        .map(fmt_num)
                        .collect()
                })
                .unwrap_or_default();
            let summary = if found.is_empty() {
                "No numbers found in the text".to_string()
            } else {
                format!("Found {} numbers: {}", found.len(), found.join(", "))
            };
            return Ok(Outcome {
                summary,
                tool_calls: calls,
                ..Default::default()
            });
        }

        // General analysis: sentiment + counts + numbers.
        let senti = invoke(&mut calls, "sentiment", json!({ "text": target }))?;
        let words = invoke(&mut calls, "word_count", json!({ "text": target }))?;
        let chars = invoke(&mut calls, "char_count", json!({ "text": target }))?;
        let nums = invoke(&mut calls, "extract_numbers", json!({ "text": target }))?;
        let num_count = nums["result"].as_array().map(|a| a.len()).unwrap_or(0);
        Ok(Outcome {
            summary: format!(
                "Analysis of \"{}\": sentiment {}, {} words, {} characters, {} numbers",
                truncate_str(&target, 60),
                senti["label"].as_str().unwrap_or("unknown"),
                words["result"],
                chars["result"],
                num_count
            ),
            tool_calls: calls,
            ..Default::default()
        })
    }
}

/// Extract the text to be analyzed from the message.
///
/// Quoted spans win, then `… of: <tail>` / `… text: <tail>`, then the
/// whole message.
fn extract_target_text(text: &str) -> String {
    if let Some(caps) = QUOTED_RE.captures(text) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            return m.as_str().to_string();
        }
    }
    if let Some(caps) = OF_TAIL_RE.captures(text) {
        return caps[1].trim().to_string();
    }
    if let Some(caps) = TEXT_TAIL_RE.captures(text) {
        return caps[1].trim().to_string();
    }
    text.to_string()
}
