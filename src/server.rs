//! HTTP/WebSocket server for the boiler telemetry hub.
//!
//! Query endpoints are pure functions of the current store snapshot:
//! - `GET /health` — liveness and version
//! - `GET /api/parameters` — feature names in catalog order
//! - `GET /api/data?feature=..&range=..` — windowed series slice
//! - `GET /api/stats?feature=..&range=..` — summary stats over a slice
//! - `GET /api/status` — load provenance (real vs demo data, row counts)
//! - `GET /api/suggestions` — mock operator suggestions
//! - `POST /api/chat` — mock chat responder
//!
//! `GET /ws` upgrades to a WebSocket carrying the simulated live feed: the
//! client subscribes to one feature at a time and receives tick frames;
//! each applied tick is also appended to the shared store through the
//! merger.

use crate::chat;
use crate::core::range::{slice_by_range, TimeRange, UnknownRangePolicy};
use crate::core::series::{SeriesPoint, SharedStore};
use crate::core::stats::{stats_of, SeriesStats};
use crate::live::{run_ticker, Tick, TickMerger, TickOutcome, TickerConfig};
use crate::suggestions;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random).
    pub port: u16,
    /// Range keys outside the closed set: fail open or reject.
    pub unknown_range_policy: UnknownRangePolicy,
    /// Simulated tick feed tuning.
    pub ticker: TickerConfig,
}

impl ServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            unknown_range_policy: UnknownRangePolicy::default(),
            ticker: TickerConfig::default(),
        }
    }
}

/// Shared server state.
pub struct ServerState {
    store: SharedStore,
    unknown_range_policy: UnknownRangePolicy,
    ticker: TickerConfig,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>, code: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/parameters
async fn parameters(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.store.read().await.features().to_vec())
}

#[derive(Deserialize)]
struct SeriesQuery {
    feature: Option<String>,
    range: Option<String>,
}

/// Windowed slice plus the anchor that actually produced it, so the caller
/// can tell a now-anchored window from a fallback-anchored one.
#[derive(Serialize)]
pub struct SeriesResponse {
    pub points: Vec<SeriesPoint>,
    pub anchor_used: DateTime<Utc>,
    pub used_fallback: bool,
}

fn resolve_query(
    query: &SeriesQuery,
    policy: UnknownRangePolicy,
) -> Result<(String, TimeRange), ApiError> {
    let feature = query
        .feature
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| bad_request("feature is required", "FEATURE_REQUIRED"))?;
    let range = TimeRange::parse(query.range.as_deref().unwrap_or("1h"), policy)
        .map_err(|e| bad_request(e.to_string(), "UNKNOWN_RANGE"))?;
    Ok((feature.to_string(), range))
}

/// GET /api/data
async fn data(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let (feature, range) = resolve_query(&query, state.unknown_range_policy)?;

    let store = state.store.read().await;
    let series = store
        .series(&feature)
        .ok_or_else(|| bad_request(format!("unknown feature: {feature}"), "UNKNOWN_FEATURE"))?;

    let slice = slice_by_range(series, range, Utc::now(), store.latest_instant());
    Ok(Json(SeriesResponse {
        points: slice.points,
        anchor_used: slice.anchor_used,
        used_fallback: slice.used_fallback,
    }))
}

/// Stats over a windowed slice, with the same anchor provenance as /api/data.
#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: SeriesStats,
    pub anchor_used: DateTime<Utc>,
    pub used_fallback: bool,
}

/// GET /api/stats
async fn stats(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let (feature, range) = resolve_query(&query, state.unknown_range_policy)?;

    let store = state.store.read().await;
    let series = store
        .series(&feature)
        .ok_or_else(|| bad_request(format!("unknown feature: {feature}"), "UNKNOWN_FEATURE"))?;

    let slice = slice_by_range(series, range, Utc::now(), store.latest_instant());
    Ok(Json(StatsResponse {
        stats: stats_of(&slice.points),
        anchor_used: slice.anchor_used,
        used_fallback: slice.used_fallback,
    }))
}

/// Load provenance for the status card.
#[derive(Serialize)]
pub struct StatusResponse {
    pub real_data: bool,
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub features: usize,
    pub latest: Option<DateTime<Utc>>,
}

/// GET /api/status
async fn status(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    let store = state.store.read().await;
    Json(StatusResponse {
        real_data: store.real_data(),
        rows_loaded: store.rows_loaded(),
        rows_dropped: store.rows_dropped(),
        features: store.features().len(),
        latest: store.latest_instant(),
    })
}

/// GET /api/suggestions
async fn get_suggestions() -> Json<Vec<suggestions::Suggestion>> {
    let generated = {
        let mut rng = rand::rng();
        suggestions::generate(&mut rng)
    };
    Json(generated)
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
async fn post_chat(Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    let (reply, delay_ms) = {
        let mut rng = rand::rng();
        let reply = chat::reply_to(&request.message, &mut rng);
        (reply, rand::Rng::random_range(&mut rng, 500..1500u64))
    };
    // Simulated thinking time, matching the feel of a model-backed responder.
    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
    Json(ChatResponse { reply })
}

/// Inbound WebSocket control frames.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WsRequest {
    Subscribe { feature: String },
    Unsubscribe,
}

/// Outbound tick frame.
#[derive(Serialize)]
struct TickFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    feature: &'a str,
    t: DateTime<Utc>,
    v: f64,
}

/// GET /ws
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    let conn_id = Uuid::new_v4();
    tracing::info!(%conn_id, "websocket connected");

    // The feed task sends into this channel; re-subscribing aborts the old
    // task, and any tick it already queued for the previous feature is
    // rejected by the merger.
    let (tick_tx, mut tick_rx) = mpsc::channel::<Tick>(32);
    let mut merger = TickMerger::new(state.store.clone());
    let mut feed: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WsRequest>(&text) {
                            Ok(WsRequest::Subscribe { feature }) => {
                                if let Some(handle) = feed.take() {
                                    handle.abort();
                                }
                                let start = {
                                    let store = state.store.read().await;
                                    store
                                        .series(&feature)
                                        .and_then(|s| s.last().map(|p| p.v))
                                        .unwrap_or(50.0)
                                };
                                tracing::info!(%conn_id, %feature, "subscribed to live feed");
                                merger.subscribe(feature.as_str());
                                feed = Some(tokio::spawn(run_ticker(
                                    feature,
                                    start,
                                    state.ticker.clone(),
                                    tick_tx.clone(),
                                )));
                            }
                            Ok(WsRequest::Unsubscribe) => {
                                if let Some(handle) = feed.take() {
                                    handle.abort();
                                }
                                merger.unsubscribe();
                                tracing::info!(%conn_id, "unsubscribed from live feed");
                            }
                            Err(e) => {
                                tracing::warn!(%conn_id, error = %e, "ignoring malformed ws frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%conn_id, error = %e, "websocket error");
                        break;
                    }
                }
            }
            Some(tick) = tick_rx.recv() => {
                if merger.apply(&tick).await == TickOutcome::Applied {
                    let frame = TickFrame {
                        kind: "tick",
                        feature: &tick.feature,
                        t: tick.t,
                        v: tick.v,
                    };
                    let Ok(json) = serde_json::to_string(&frame) else {
                        continue;
                    };
                    if socket.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    // Teardown stops the feed before the handler returns; nothing can
    // append after this point.
    if let Some(handle) = feed.take() {
        handle.abort();
    }
    merger.unsubscribe();
    tracing::info!(%conn_id, "websocket disconnected");
}

/// Run the HTTP server. Returns the bound address and a shutdown handle.
pub async fn run(
    config: ServerConfig,
    store: SharedStore,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState {
        store,
        unknown_range_policy: config.unknown_range_policy,
        ticker: config.ticker,
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/parameters", get(parameters))
        .route("/api/data", get(data))
        .route("/api/stats", get(stats))
        .route("/api/status", get(status))
        .route("/api/suggestions", get(get_suggestions))
        .route("/api/chat", post(post_chat))
        .route("/ws", get(ws_upgrade))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("telemetry hub listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("server shutdown signal received");
            })
            .await
        {
            tracing::error!("server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
