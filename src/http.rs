//! HTTP transport for lingodesk
//!
//! Axum router with allow-any CORS, request-id propagation, a latency
//! metrics ring, and the endpoint handlers mounted under an optional root
//! path for reverse-proxy deployments. Health, info, and metrics are plain
//! JSON.

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::{cmp::Ordering, collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use uuid::Uuid;

use crate::clients::{LanguageModel, SpeechModel};
use crate::config::Config;
use crate::endpoints;
use crate::error::{EngineError, Result};
use crate::prompts::PromptRegistry;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prompts: Arc<PromptRegistry>,
    pub language: Arc<dyn LanguageModel>,
    pub speech: Arc<dyn SpeechModel>,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

/// Metrics for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
    pub routes_count: HashMap<String, u64>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: std::time::SystemTime::UNIX_EPOCH
                .elapsed()
                .unwrap_or_default()
                .as_secs(),
            errors_total: 0,
            latencies: Vec::with_capacity(256),
            routes_count: HashMap::new(),
        }
    }
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Service banner
pub async fn root_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({"service": "lingodesk", "status": "ok"}).to_string(),
    )
}

/// Info endpoint
pub async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    let system = &state.config.system;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "models": {
                "translation": system.translation_model,
                "correction": system.correction_model,
                "chatbot": system.chatbot_model,
                "audiobook": system.audiobook_model,
                "tts": system.tts_model
            },
            "prompts": state.prompts.list().len(),
            "server": {
                "bind": state.config.runtime.http_bind.to_string(),
                "root_path": state.config.runtime.root_path,
                "speech_dir": system.speech_dir
            }
        })
        .to_string(),
    )
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    // Compute latency stats
    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    // Top 5 routes
    let mut routes_vec: Vec<_> = metrics.routes_count.iter().collect();
    routes_vec.sort_by(|a, b| b.1.cmp(a.1));
    let routes_top_5: Vec<_> = routes_vec
        .into_iter()
        .take(5)
        .map(|(k, v)| json!({ "route": k, "count": v }))
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms,
            "routes_top_5": routes_top_5
        })
        .to_string(),
    )
}

/// Record request totals, error counts, and the latency ring.
async fn track_metrics(
    State(metrics): State<Arc<Mutex<HttpMetrics>>>,
    req: Request,
    next: Next,
) -> Response {
    let route = req.uri().path().to_string();
    let start = std::time::Instant::now();
    let resp = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as f64;

    let mut m = metrics.lock().await;
    if latency_ms > 0.0 {
        m.latencies.push(latency_ms);
        if m.latencies.len() > 256 {
            m.latencies.remove(0);
        }
    }
    if !resp.status().is_success() {
        m.errors_total = m.errors_total.saturating_add(1);
    }
    m.total_requests = m.total_requests.saturating_add(1);
    m.last_request_unix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    *m.routes_count.entry(route).or_insert(0) += 1;

    resp
}

/// Accept an incoming correlation id or mint one, log the request, and echo
/// the id back to the client.
async fn propagate_request_id(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let mut resp = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = %resp.status(),
        latency_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "request complete"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_millis(state.config.runtime.http_request_timeout_ms);
    let root_path = state.config.runtime.root_path.clone();

    let api = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/metrics", get(metrics_handler))
        .route("/translation", post(endpoints::translation::translate_text))
        .route("/correction", post(endpoints::correction::correct_writing))
        .route("/chatbot", post(endpoints::chatbot::chatbot_chat))
        .route(
            "/text-to-speech",
            post(endpoints::text_to_speech::text_to_speech),
        )
        .route("/audio-book", post(endpoints::audio_book::audio_book))
        .route(
            "/del-speech-files",
            get(endpoints::speech_files::del_speech_files),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_metrics,
        ))
        .layer(middleware::from_fn(propagate_request_id))
        .with_state(state);

    match root_path {
        Some(root) => Router::new().nest(&root, api),
        None => api,
    }
}

/// Start the HTTP server
pub async fn serve(state: AppState) -> Result<()> {
    let bind = state.config.runtime.http_bind;
    if let Some(root) = &state.config.runtime.root_path {
        tracing::info!("mounting API under root path {root}");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| EngineError::Internal {
            message: format!("failed to bind HTTP listener: {e}"),
        })?;

    tracing::info!("starting HTTP server on {bind}");

    axum::serve(listener, app)
        .await
        .map_err(|e| EngineError::Internal {
            message: format!("HTTP server error: {e}"),
        })?;

    Ok(())
}
