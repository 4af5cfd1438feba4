//! Built-in text analysis tools.
//!
//! Counting, number extraction, lexicon-based sentiment scoring, and
//! leading-sentence summarization.  The sentiment lexicons and
//! thresholds are illustrative heuristics, kept as named constants so
//! they can be tuned without touching the scoring logic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::{register_tool, require_str, ToolError, ToolMeta};

/// Score above which a text is labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Score below which a text is labeled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

static POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "love", "like", "enjoy",
    "happy", "pleased", "satisfied", "awesome", "brilliant", "perfect", "beautiful", "nice",
    "best", "superb",
];

static NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "dislike", "sad", "angry", "upset",
    "disappointed", "frustrated", "annoyed", "worst", "ugly", "boring", "stupid", "ridiculous",
    "pathetic",
];

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+\.?\d*").expect("number regex"));

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex"));

/// Count whitespace-separated tokens that carry at least one
/// alphanumeric character.  Bare punctuation (`"+"` in
/// `"Calculate 15 + 27"`) is not a word.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .count()
}

/// Count Unicode scalar values.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Extract every numeric literal from `text`, in order of appearance.
///
/// Returns a finite list; empty when the text carries no numbers.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Sentiment classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Result of a sentiment analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub total_words: usize,
}

/// Lexicon-based sentiment scoring.
///
/// score = (positive hits − negative hits) / total words, labeled by
/// [`POSITIVE_THRESHOLD`] / [`NEGATIVE_THRESHOLD`].  Confidence grows
/// with the score's distance from zero, starting at 0.5.
pub fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let words: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();
    let total_words = words.len();

    if total_words == 0 {
        return Sentiment {
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            positive_hits: 0,
            negative_hits: 0,
            total_words: 0,
        };
    }

    let positive_hits = words.iter().filter(|w| POSITIVE_WORDS.contains(w)).count();
    let negative_hits = words.iter().filter(|w| NEGATIVE_WORDS.contains(w)).count();
    let score = (positive_hits as f64 - negative_hits as f64) / total_words as f64;

    let label = if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        label,
        confidence: (0.5 + score.abs()).min(1.0),
        positive_hits,
        negative_hits,
        total_words,
    }
}

/// Split `text` into sentences.
///
/// A sentence boundary is `.`, `!`, or `?` followed by whitespace or
/// end-of-string.  Sentences are returned trimmed, without empty
/// entries.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_end = chars.peek().is_none();
            let before_ws = chars
                .peek()
                .map(|&(_, next)| next.is_whitespace())
                .unwrap_or(false);
            if at_end || before_ws {
                let end = i + c.len_utf8();
                let s = text[start..end].trim();
                if !s.is_empty() {
                    sentences.push(s);
                }
                start = end;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Return the first `max_sentences` sentences of `text`.
///
/// When the text has no more sentences than requested the input is
/// returned unchanged, so the operation is an idempotent no-op on
/// already-short texts.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return text.to_string();
    }
    sentences[..max_sentences].join(" ")
}

// ── JSON dispatch wrappers ───────────────────────────────────

fn word_count_json(args: &Value) -> Result<Value, ToolError> {
    let text = require_str(args, "text")?;
    Ok(json!({ "result": word_count(text) }))
}

fn char_count_json(args: &Value) -> Result<Value, ToolError> {
    let text = require_str(args, "text")?;
    Ok(json!({ "result": char_count(text) }))
}

fn extract_numbers_json(args: &Value) -> Result<Value, ToolError> {
    let text = require_str(args, "text")?;
    Ok(json!({ "result": extract_numbers(text) }))
}

fn sentiment_json(args: &Value) -> Result<Value, ToolError> {
    let text = require_str(args, "text")?;
    Ok(serde_json::to_value(sentiment(text)).expect("sentiment serializes"))
}

fn summarize_json(args: &Value) -> Result<Value, ToolError> {
    let text = require_str(args, "text")?;
    let max = args
        .get("max_sentences")
        .and_then(Value::as_u64)
        .unwrap_or(3) as usize;
    Ok(json!({ "result": summarize(text, max) }))
}

fn text_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": { "type": "string", "description": "Text to analyze." }
        },
        "required": ["text"],
        "additionalProperties": false
    })
}

/// Register all text tools in the global registry.
pub fn register() {
    register_tool(
        ToolMeta {
            name: "word_count".into(),
            description: "Count words (whitespace tokens with at least one alphanumeric character).".into(),
            args_schema: text_schema(),
        },
        word_count_json,
    );
    register_tool(
        ToolMeta {
            name: "char_count".into(),
            description: "Count characters (Unicode scalar values).".into(),
            args_schema: text_schema(),
        },
        char_count_json,
    );
    register_tool(
        ToolMeta {
            name: "extract_numbers".into(),
            description: "Extract all numeric literals from text, in order of appearance.".into(),
            args_schema: text_schema(),
        },
        extract_numbers_json,
    );
    register_tool(
        ToolMeta {
            name: "sentiment".into(),
            description: "Lexicon-based sentiment scoring: label (positive/negative/neutral) plus confidence.".into(),
            args_schema: text_schema(),
        },
        sentiment_json,
    );
    register_tool(
        ToolMeta {
            name: "summarize".into(),
            description: "Return the first max_sentences sentences of the text.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to summarize." },
                    "max_sentences": { "type": "integer", "description": "Sentence budget (default 3)." }
                },
                "required": ["text"],
                "additionalProperties": false
            }),
        },
        summarize_json,
    );
}
