//! Basic integration tests for the HTTP gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use mini_swarm::config::Config;
use mini_swarm::gateway;
use mini_swarm::router::Router;

async fn spawn() -> gateway::Gateway {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let router = Arc::new(Router::new(&Config::default()));
    gateway::start_gateway(addr, router)
        .await
        .expect("gateway should bind an ephemeral port")
}

#[tokio::test]
async fn status_endpoint_returns_ok() {
    let gw = spawn().await;

    let resp = reqwest::get(format!("http://{}/api/status", gw.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    gw.handle.abort();
}

#[tokio::test]
async fn health_reports_handlers_and_tools() {
    let gw = spawn().await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/health", gw.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["handlers"], 3);
    assert!(body["tools"].as_u64().unwrap() >= 12);

    gw.handle.abort();
}

#[tokio::test]
async fn route_endpoint_round_trips_an_envelope() {
    let gw = spawn().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/route", gw.addr))
        .json(&serde_json::json!({ "message": "Calculate 15 + 27" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["handler"], "math");
    assert_eq!(body["payload"]["tool_calls"][0]["tool"], "add");

    gw.handle.abort();
}

#[tokio::test]
async fn error_envelopes_surface_as_422() {
    let gw = spawn().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/route", gw.addr))
        .json(&serde_json::json!({ "message": "Calculate 100 / 0" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "tool_error");

    gw.handle.abort();
}

#[tokio::test]
async fn tools_and_handlers_catalogues_are_served() {
    let gw = spawn().await;

    let tools: serde_json::Value = reqwest::get(format!("http://{}/api/tools", gw.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(tools.as_array().unwrap().len() >= 12);

    let handlers: serde_json::Value = reqwest::get(format!("http://{}/api/handlers", gw.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = handlers
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["math", "text", "task"]);

    gw.handle.abort();
}
