//! Math handler: arithmetic, named operations, and linear equations.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::router::RouteContext;
use crate::tools::extract_numbers;
use crate::utils::fmt_num;

use super::{
    invoke, keyword_hits, Capability, Handler, HandlerError, Message, Outcome, DOMAIN_SCORE_CAP,
};

/// Matches a linear equation of the form `ax + b = c` (coefficient,
/// constant, and sign all optional).
static EQUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+-]?\d*\.?\d*)\s*\*?\s*([a-zA-Z])\s*(?:([+-])\s*(\d+\.?\d*))?\s*=\s*([+-]?\d+\.?\d*)")
        .expect("equation regex")
});

static CAPABILITY: Capability = Capability {
    keywords: &[
        "calculate", "compute", "solve", "equation", "sum", "difference", "product", "quotient",
        "add", "subtract", "multiply", "divide", "square root", "sqrt", "power",
    ],
    tools: &[
        "add", "subtract", "multiply", "divide", "sqrt", "power", "solve_linear",
    ],
};

/// Strong math intents that override text-analysis exclusion terms.
static STRONG_KEYWORDS: &[&str] = &["solve", "calculate", "compute", "sum of"];

/// Text-analysis phrasing that pulls a message away from this handler
/// even when it contains numbers ("count the words", "extract numbers").
static EXCLUSION_TERMS: &[&str] = &[
    "sentiment", "summarize", "summary", "count the words", "word count", "character count",
    "how many words", "extract numbers", "extract the numbers", "analyze the",
];

pub struct MathHandler;

#[async_trait]
impl Handler for MathHandler {
    fn name(&self) -> &'static str {
        "math"
    }

    fn capability(&self) -> &Capability {
        &CAPABILITY
    }

    fn score(&self, msg: &Message) -> f64 {
        let text = &msg.text;
        let lower = text.to_lowercase();

        let has_equation = text.contains('=') && EQUATION_RE.is_match(text);
        let strong = has_equation || keyword_hits(&lower, STRONG_KEYWORDS) > 0;

        if !strong && keyword_hits(&lower, EXCLUSION_TERMS) > 0 {
            return 0.0;
        }

        let mut score = 0.0;
        if has_equation {
            score += 0.6;
        }
        if keyword_hits(&lower, STRONG_KEYWORDS) > 0 {
            score += 0.4;
        }
        if text.chars().any(|c| c.is_ascii_digit()) {
            score += 0.2;
        }
        if text.contains(['+', '-', '*', '/', '^']) {
            score += 0.2;
        }
        score += 0.1 * keyword_hits(&lower, CAPABILITY.keywords) as f64;

        score.min(DOMAIN_SCORE_CAP)
    }

    async fn handle(
        &self,
        msg: &Message,
        _ctx: &RouteContext<'_>,
    ) -> Result<Outcome, HandlerError> {
        let text = &msg.text;
        let lower = text.to_lowercase();
        let numbers = extract_numbers(text);
        let mut calls = Vec::new();

        // Equation solving takes priority: "solve 2x + 5 = 15".
        if text.contains('=') {
            let (a, b, c, shown) = parse_equation(text)?;
            let result = invoke(&mut calls, "solve_linear", json!({ "a": a, "b": b, "c": c }))?;
            let x = result["x"].as_f64().unwrap_or_default();
            return Ok(Outcome {
                summary: format!("Solved {shown}: x = {}", fmt_num(x)),
                tool_calls: calls,
                ..Default::default()
            });
        }

        // Named operations: "square root of 16", "2 to the power of 8".
        if lower.contains("square root") || lower.contains("sqrt") {
            let x = *numbers
                .first()
                .ok_or_else(|| HandlerError::ParseFailure("no number for square root".into()))?;
            let result = invoke(&mut calls, "sqrt", json!({ "x": x }))?;
            let r = result["result"].as_f64().unwrap_or_default();
            return Ok(Outcome {
                summary: format!("The square root of {} is {}", fmt_num(x), fmt_num(r)),
                tool_calls: calls,
                ..Default::default()
            });
        }

        if lower.contains("power") || text.contains('^') || text.contains("**") {
            if numbers.len() < 2 {
                return Err(HandlerError::ParseFailure(
                    "need base and exponent for power".into(),
                ));
            }
            let (base, exponent) = (numbers[0], numbers[1]);
            let result = invoke(
                &mut calls,
                "power",
                json!({ "base": base, "exponent": exponent }),
            )?;
            let r = result["result"].as_f64().unwrap_or_default();
            return Ok(Outcome {
                summary: format!(
                    "{} to the power of {} is {}",
                    fmt_num(base),
                    fmt_num(exponent),
                    fmt_num(r)
                ),
                tool_calls: calls,
                ..Default::default()
            });
        }

        // Binary arithmetic on the first two operands.
        if let Some((tool, symbol)) = detect_operation(text, &lower) {
            if numbers.len() < 2 {
                return Err(HandlerError::ParseFailure(
                    "need two numbers for arithmetic".into(),
                ));
            }
            let (a, b) = (numbers[0], numbers[1]);
            let result = invoke(&mut calls, tool, json!({ "a": a, "b": b }))?;
            let r = result["result"].as_f64().unwrap_or_default();
            return Ok(Outcome {
                summary: format!("{} {symbol} {} = {}", fmt_num(a), fmt_num(b), fmt_num(r)),
                tool_calls: calls,
                ..Default::default()
            });
        }

        // Fallback: sum everything ("what is the total of 1, 2 and 3").
        if numbers.len() >= 2 {
            let mut acc = numbers[0];
            for &n in &numbers[1..] {
                let result = invoke(&mut calls, "add", json!({ "a": acc, "b": n }))?;
                acc = result["result"].as_f64().unwrap_or_default();
            }
            return Ok(Outcome {
                summary: format!(
                    "The sum of the {} numbers is {}",
                    numbers.len(),
                    fmt_num(acc)
                ),
                tool_calls: calls,
                ..Default::default()
            });
        }

        Err(HandlerError::ParseFailure(
            "no usable operands found in message".into(),
        ))
    }
}

/// Parse `ax + b = c` out of the message text.
///
/// Returns `(a, b, c, matched_text)`.  A missing coefficient means 1, a
/// bare sign means ±1, a missing constant means 0.
fn parse_equation(text: &str) -> Result<(f64, f64, f64, String), HandlerError> {
    let caps = EQUATION_RE
        .captures(text)
        .ok_or_else(|| HandlerError::ParseFailure("could not parse equation".into()))?;

    let coeff_str = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let a = match coeff_str {
        "" | "+" => 1.0,
        "-" => -1.0,
        s => s
            .parse::<f64>()
            .map_err(|_| HandlerError::ParseFailure(format!("bad coefficient `{s}`")))?,
    };

    let b = match (caps.get(3), caps.get(4)) {
        (Some(sign), Some(konst)) => {
            let k: f64 = konst
                .as_str()
                .parse()
                .map_err(|_| HandlerError::ParseFailure("bad constant".into()))?;
            if sign.as_str() == "-" {
                -k
            } else {
                k
            }
        }
        _ => 0.0,
    };

    let c: f64 = caps
        .get(5)
        .map(|m| m.as_str())
        .unwrap_or("")
        .parse()
        .map_err(|_| HandlerError::ParseFailure("bad right-hand side".into()))?;

    let shown = caps.get(0).map(|m| m.as_str().trim()).unwrap_or("").to_string();
    Ok((a, b, c, shown))
}

/// Detect which binary arithmetic operation the message asks for.
///
/// Symbols win over words; `-` is only treated as subtraction when
/// spaced, so negative literals don't trigger it.
fn detect_operation(text: &str, lower: &str) -> Option<(&'static str, &'static str)> {
    if text.contains('+') {
        return Some(("add", "+"));
    }
    if text.contains(" - ") {
        return Some(("subtract", "-"));
    }
    if text.contains('*') {
        return Some(("multiply", "*"));
    }
    if text.contains('/') {
        return Some(("divide", "/"));
    }
    if lower.contains("add") || lower.contains("sum") || lower.contains("plus") {
        return Some(("add", "+"));
    }
    if lower.contains("subtract") || lower.contains("minus") || lower.contains("difference") {
        return Some(("subtract", "-"));
    }
    if lower.contains("multiply") || lower.contains("times") || lower.contains("product") {
        return Some(("multiply", "*"));
    }
    if lower.contains("divide") || lower.contains("quotient") {
        return Some(("divide", "/"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equation_parses_with_defaults() {
        let (a, b, c, _) = parse_equation("solve 2x + 5 = 15").unwrap();
        assert_eq!((a, b, c), (2.0, 5.0, 15.0));

        let (a, b, c, _) = parse_equation("x = 4").unwrap();
        assert_eq!((a, b, c), (1.0, 0.0, 4.0));

        let (a, b, c, _) = parse_equation("-y - 3 = 7").unwrap();
        assert_eq!((a, b, c), (-1.0, -3.0, 7.0));
    }

    #[test]
    fn scoring_prefers_math_content() {
        let h = MathHandler;
        assert!(h.score(&Message::new("Calculate 15 + 27")) > 0.5);
        assert!(h.score(&Message::new("solve 2x + 5 = 15")) > 0.5);
        assert_eq!(h.score(&Message::new("hello there")), 0.0);
        // Text-analysis phrasing suppresses the score.
        assert_eq!(
            h.score(&Message::new("count the words in this sentence")),
            0.0
        );
    }

    #[test]
    fn score_is_capped() {
        let h = MathHandler;
        let s = h.score(&Message::new("calculate and solve the equation 2x + 5 = 15"));
        assert!(s <= DOMAIN_SCORE_CAP);
    }

    #[test]
    fn spaced_minus_is_subtraction_but_negatives_are_not() {
        assert_eq!(detect_operation("10 - 4", "10 - 4"), Some(("subtract", "-")));
        assert_eq!(detect_operation("-5", "-5"), None);
    }
}
