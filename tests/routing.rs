//! Integration tests for routing, decomposition, and error recovery.

use mini_swarm::config::Config;
use mini_swarm::handlers::Message;
use mini_swarm::router::{Router, Status};

fn router() -> Router {
    Router::new(&Config::default())
}

// ── handler selection ────────────────────────────────────────

#[tokio::test]
async fn arithmetic_routes_to_math() {
    let env = router().route(&Message::new("Calculate 15 + 27")).await;
    assert_eq!(env.handler, "math");
    assert_eq!(env.status, Status::Success);
    let payload = env.payload.unwrap();
    assert!(payload.summary.contains("42"), "summary: {}", payload.summary);
    assert_eq!(payload.tool_calls[0].tool, "add");
}

#[tokio::test]
async fn sentiment_routes_to_text() {
    let env = router()
        .route(&Message::new("Analyze the sentiment of: I love sunny days!"))
        .await;
    assert_eq!(env.handler, "text");
    assert_eq!(env.status, Status::Success);
    let payload = env.payload.unwrap();
    assert_eq!(payload.tool_calls[0].tool, "sentiment");
    assert!(payload.summary.contains("positive"), "summary: {}", payload.summary);
}

#[tokio::test]
async fn no_domain_keywords_falls_back_to_task() {
    let env = router().route(&Message::new("hello there")).await;
    assert_eq!(env.handler, "task");
    assert_eq!(env.status, Status::Success);
}

#[tokio::test]
async fn equation_routes_to_math_and_solves() {
    let env = router().route(&Message::new("Please solve 2x + 5 = 15")).await;
    assert_eq!(env.handler, "math");
    let payload = env.payload.unwrap();
    assert_eq!(payload.tool_calls[0].tool, "solve_linear");
    assert!(payload.summary.contains("x = 5"), "summary: {}", payload.summary);
}

// ── compound decomposition ───────────────────────────────────

#[tokio::test]
async fn compound_message_decomposes_in_order() {
    let env = router()
        .route(&Message::new(
            "Help me solve 2x + 5 = 15 and then count the words in the solution",
        ))
        .await;
    assert_eq!(env.handler, "task");
    assert_eq!(env.status, Status::Success);

    let payload = env.payload.unwrap();
    assert_eq!(payload.subtasks.len(), 2, "expected exactly 2 sub-clauses");
    assert_eq!(payload.subtasks[0].handler, "math");
    assert_eq!(payload.subtasks[1].handler, "text");
    assert_eq!(payload.subtasks[0].status, Status::Success);
    assert_eq!(payload.subtasks[1].status, Status::Success);

    // Summary concatenates both outcomes in sub-clause order.
    let first = payload.subtasks[0].summary().unwrap();
    let second = payload.subtasks[1].summary().unwrap();
    let i = payload.summary.find(first).expect("first outcome in summary");
    let j = payload.summary.find(second).expect("second outcome in summary");
    assert!(i < j);
}

#[tokio::test]
async fn too_many_subtasks_is_a_structured_error() {
    let env = router()
        .route(&Message::new("1 and 2 and 3 and 4 and 5 and 6"))
        .await;
    assert_eq!(env.handler, "task");
    assert_eq!(env.status, Status::Error);
    assert_eq!(env.error.as_ref().unwrap().kind, "too_many_subtasks");
}

#[tokio::test]
async fn failed_subtask_does_not_fail_the_whole_request() {
    let env = router()
        .route(&Message::new("Calculate 10 / 0 and then count the words in hello world"))
        .await;
    assert_eq!(env.handler, "task");
    assert_eq!(env.status, Status::Success);

    let payload = env.payload.unwrap();
    assert_eq!(payload.subtasks.len(), 2);
    assert_eq!(payload.subtasks[0].status, Status::Error);
    assert_eq!(payload.subtasks[0].error.as_ref().unwrap().kind, "tool_error");
    assert_eq!(payload.subtasks[1].status, Status::Success);
}

// ── error recovery ───────────────────────────────────────────

#[tokio::test]
async fn division_by_zero_becomes_tool_error_envelope() {
    let env = router().route(&Message::new("Calculate 100 / 0")).await;
    assert_eq!(env.handler, "math");
    assert_eq!(env.status, Status::Error);
    let detail = env.error.unwrap();
    assert_eq!(detail.kind, "tool_error");
    assert!(detail.message.contains("division by zero"));
}

#[tokio::test]
async fn unparseable_math_request_is_a_parse_failure() {
    let env = router().route(&Message::new("calculate the answer")).await;
    assert_eq!(env.handler, "math");
    assert_eq!(env.status, Status::Error);
    assert_eq!(env.error.unwrap().kind, "parse_failure");
}

// ── determinism ──────────────────────────────────────────────

#[tokio::test]
async fn routing_is_idempotent() {
    let r = router();
    for text in [
        "Calculate 15 + 27",
        "Analyze the sentiment of: I love sunny days!",
        "hello there",
        "solve 2x + 5 = 15 and then count the words in the solution",
        "Calculate 100 / 0",
    ] {
        let msg = Message::new(text);
        let first = r.route(&msg).await;
        let second = r.route(&msg).await;
        assert_eq!(first, second, "envelopes drifted for {text:?}");
    }
}

#[tokio::test]
async fn exactly_one_handler_runs_per_message() {
    let r = router();
    for text in ["Calculate 1 + 1", "what is the sentiment of: nice", "hm"] {
        let env = r.route(&Message::new(text)).await;
        // The envelope names a single handler, always.
        assert!(["math", "text", "task"].contains(&env.handler.as_str()));
    }
}
