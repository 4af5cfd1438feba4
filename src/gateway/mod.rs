//! Minimal HTTP gateway: the thin transport wrapper around the router.
//!
//! Starts by default; set `SWARMD_GATEWAY=0` to disable.  Serves:
//! - `GET  /api/status`   liveness probe, `{ "status": "ok" }`
//! - `GET  /api/health`   version, uptime, handler/tool counts
//! - `GET  /api/tools`    the tool metadata registry
//! - `GET  /api/handlers` registered handlers and their capabilities
//! - `POST /api/route`    routes `{ "message": "..." }`, returns an envelope
//!
//! The gateway performs serialization and protocol-level status codes;
//! the router core never does.

mod auth;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::OnceLock;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router as AxumRouter,
};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::router::{Router, Status};

pub(crate) static STARTUP_TIME: OnceLock<std::time::Instant> = OnceLock::new();

/// Handle returned by [`start_gateway`].
pub struct Gateway {
    /// Server task handle.
    pub handle: JoinHandle<()>,
    /// The address the server is actually listening on.
    pub addr: SocketAddr,
}

/// Shared state injected into axum handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) router: Arc<Router>,
    pub(crate) api_token: Option<String>,
}

/// Start the gateway HTTP server on `addr`.
pub async fn start_gateway(addr: SocketAddr, router: Arc<Router>) -> std::io::Result<Gateway> {
    let api_token = std::env::var("SWARMD_API_TOKEN")
        .ok()
        .filter(|s| !s.is_empty());

    if api_token.is_some() {
        info!("API authentication enabled (SWARMD_API_TOKEN set)");
    } else {
        warn!("API authentication disabled (SWARMD_API_TOKEN not set)");
    }

    let state = AppState { router, api_token };
    let _ = STARTUP_TIME.set(std::time::Instant::now());

    let app = AxumRouter::new()
        .route("/api/status", get(status_handler))
        .route("/api/health", get(health_handler))
        .route("/api/tools", get(tools_handler))
        .route("/api/handlers", get(handlers_handler))
        .route("/api/route", post(route_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "gateway server error");
        }
    });

    info!(addr = %bound, "gateway listening");
    Ok(Gateway { handle, addr: bound })
}

/// Start the gateway unless `SWARMD_GATEWAY=0`.
///
/// Tries the configured port first, then the next 9 ports, so a stale
/// instance doesn't block startup.
pub async fn spawn_gateway_if_enabled(
    cfg: &crate::config::GatewayConfig,
    router: Arc<Router>,
) -> Option<Gateway> {
    if std::env::var("SWARMD_GATEWAY").as_deref() == Ok("0") {
        info!("gateway disabled via SWARMD_GATEWAY=0");
        return None;
    }

    for offset in 0..10u16 {
        let port = cfg.port.saturating_add(offset);
        let addr: SocketAddr = match format!("{}:{}", cfg.bind, port).parse() {
            Ok(a) => a,
            Err(e) => {
                warn!(bind = %cfg.bind, error = %e, "invalid gateway bind address");
                return None;
            }
        };
        match start_gateway(addr, router.clone()).await {
            Ok(gw) => return Some(gw),
            Err(e) => {
                warn!(%addr, error = %e, "gateway bind failed, trying next port");
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/status`
async fn status_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/health`
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = STARTUP_TIME
        .get()
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs,
        "handlers": state.router.handlers().len(),
        "tools": crate::tools::list_tools().len(),
    }))
}

/// `GET /api/tools`
async fn tools_handler() -> impl IntoResponse {
    Json(crate::tools::list_tools())
}

/// `GET /api/handlers`
async fn handlers_handler(State(state): State<AppState>) -> impl IntoResponse {
    let entries: Vec<serde_json::Value> = state
        .router
        .handlers()
        .iter()
        .map(|h| {
            serde_json::json!({
                "name": h.name(),
                "capability": h.capability(),
            })
        })
        .collect();
    Json(entries)
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    message: String,
}

/// `POST /api/route`
///
/// Error envelopes are surfaced as HTTP 422; the envelope itself is
/// still the body either way.
async fn route_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> impl IntoResponse {
    let msg = crate::handlers::Message::new(req.message);
    let envelope = state.router.route(&msg).await;
    let code = match envelope.status {
        Status::Success => StatusCode::OK,
        Status::Error => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (code, Json(envelope))
}
