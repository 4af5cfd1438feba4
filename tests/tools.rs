//! Integration tests for the tool library and its registry.

use mini_swarm::tools::{self, SentimentLabel, ToolError};
use serde_json::json;

// ── arithmetic ───────────────────────────────────────────────

#[test]
fn add_matches_plain_addition() {
    for (a, b) in [(1.0, 2.0), (-4.5, 4.5), (0.0, 0.0), (1e9, 2.5)] {
        assert_eq!(tools::add(a, b), a + b);
    }
}

#[test]
fn divide_by_zero_always_fails() {
    for a in [0.0, 1.0, -7.25, 1e12] {
        assert_eq!(tools::divide(a, 0.0), Err(ToolError::DivisionByZero));
    }
}

#[test]
fn sqrt_of_negative_fails_with_invalid_domain() {
    assert!(matches!(
        tools::sqrt(-1.0),
        Err(ToolError::InvalidDomain(_))
    ));
}

#[test]
fn solve_linear_two_x_plus_five() {
    // 2x + 5 = 15
    assert_eq!(tools::solve_linear(2.0, 5.0, 15.0), Ok(5.0));
}

#[test]
fn solve_linear_zero_coefficient_is_degenerate() {
    assert_eq!(
        tools::solve_linear(0.0, 5.0, 15.0),
        Err(ToolError::DegenerateEquation)
    );
}

// ── text ─────────────────────────────────────────────────────

#[test]
fn word_count_splits_on_whitespace() {
    // "+" is a bare operator token, not a word.
    assert_eq!(tools::word_count("Calculate 15 + 27"), 3);
}

#[test]
fn sentiment_positive_example() {
    let s = tools::sentiment("I love sunny days!");
    assert_eq!(s.label, SentimentLabel::Positive);
    assert!(s.confidence > 0.5);
}

#[test]
fn extract_numbers_preserves_order() {
    assert_eq!(
        tools::extract_numbers("5 apples and 3 oranges make 8 total"),
        vec![5.0, 3.0, 8.0]
    );
}

#[test]
fn summarize_is_a_noop_on_short_text() {
    let text = "Only one sentence here.";
    assert_eq!(tools::summarize(text, 3), text);
    // Idempotent: applying it again changes nothing.
    assert_eq!(tools::summarize(&tools::summarize(text, 3), 3), text);
}

#[test]
fn tools_are_deterministic() {
    let text = "Great work on 3 of the 4 tasks!";
    assert_eq!(tools::extract_numbers(text), tools::extract_numbers(text));
    let a = tools::sentiment(text);
    let b = tools::sentiment(text);
    assert_eq!(a.label, b.label);
    assert_eq!(a.confidence, b.confidence);
}

// ── registry dispatch ────────────────────────────────────────

#[test]
fn call_tool_dispatches_by_name() {
    tools::init();

    let result = tools::call_tool("add", &json!({ "a": 2.0, "b": 3.0 })).unwrap();
    assert_eq!(result["result"], 5.0);

    let result = tools::call_tool("solve_linear", &json!({ "a": 2.0, "b": 5.0, "c": 15.0 }))
        .unwrap();
    assert_eq!(result["x"], 5.0);
}

#[test]
fn call_tool_surfaces_domain_errors() {
    tools::init();

    assert_eq!(
        tools::call_tool("divide", &json!({ "a": 1.0, "b": 0.0 })),
        Err(ToolError::DivisionByZero)
    );
}

#[test]
fn call_tool_rejects_unknown_names_and_missing_args() {
    tools::init();

    assert!(matches!(
        tools::call_tool("launch_rockets", &json!({})),
        Err(ToolError::UnknownTool(_))
    ));
    assert_eq!(
        tools::call_tool("add", &json!({ "a": 1.0 })),
        Err(ToolError::MissingArgument("b"))
    );
}

#[test]
fn registry_lists_every_builtin_with_valid_schema() {
    // init() is idempotent — safe to call more than once.
    tools::init();
    tools::init();

    let metas = tools::list_tools();
    let names: Vec<&str> = metas.iter().map(|m| m.name.as_str()).collect();

    for expected in [
        "add",
        "subtract",
        "multiply",
        "divide",
        "sqrt",
        "power",
        "solve_linear",
        "word_count",
        "char_count",
        "extract_numbers",
        "sentiment",
        "summarize",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    for meta in &metas {
        let obj = meta
            .args_schema
            .as_object()
            .unwrap_or_else(|| panic!("{}: args_schema is not an object", meta.name));
        assert_eq!(
            obj.get("type").and_then(|v| v.as_str()),
            Some("object"),
            "{}: args_schema.type must be \"object\"",
            meta.name
        );
        assert!(
            obj.get("properties").is_some_and(|p| p.is_object()),
            "{}: args_schema must have object properties",
            meta.name
        );
    }
}
