//! HTTP gateway in front of the provider.
//!
//! Routes:
//! - `GET /health`: liveness and version
//! - `GET /search/{company,person,job}`: forward typed query parameters
//!   (intent segment matched case-insensitively)
//! - `GET /search?q=`: classify free text, then forward
//! - `POST /classify`: classification only
//! - `GET /tools`, `POST /tools/call`: tool adapter surface

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use prospect_classify::{Classifier, classifier_from_config};
use prospect_core::config::Config;
use prospect_core::constants;
use prospect_core::error::RouterError;
use prospect_core::types::{CompanySearch, Intent, JobSearch, PersonSearch, SearchRequest};
use prospect_provider::{ProviderBody, ProviderClient, SearchBackend};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared state for the HTTP gateway.
pub struct AppState {
    pub backend: Arc<dyn SearchBackend>,
    pub classifier: Arc<dyn Classifier>,
    pub server_start: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn SearchBackend>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            backend,
            classifier,
            server_start: Instant::now(),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/search", get(routed_search_handler))
        .route("/search/{intent}", get(intent_search_handler))
        .route("/classify", post(classify_handler))
        .route("/tools", get(tools_handler))
        .route("/tools/call", post(tool_call_handler))
        .with_state(state)
}

/// Start the gateway. `bind_override` replaces `server.listen_addr`.
pub async fn run_http_server(
    config: &Config,
    bind_override: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let backend = Arc::new(ProviderClient::new(&config.provider)?);
    let classifier = classifier_from_config(&config.classifier)?;
    let state = Arc::new(AppState::new(backend, classifier));
    let app = build_router(state);

    let addr = bind_override.unwrap_or(&config.server.listen_addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        classifier = ?config.classifier.backend,
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Error envelope shared by every route.
fn error_body(code: &str, message: impl Into<String>, data: Option<Value>) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert("message".to_string(), Value::String(message.into()));
    if let Some(d) = data {
        error_obj.insert("data".to_string(), d);
    }
    json!({ "error": error_obj })
}

fn invalid_input(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(error_body("invalid_input", message, None)),
    )
        .into_response()
}

pub(crate) fn error_response(err: &RouterError) -> Response {
    let (status, data) = match err {
        RouterError::ProviderRequestFailed { status, body } => {
            let code = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (code, Some(json!({ "status": status, "body": body })))
        }
        RouterError::ProviderUnreachable(_) | RouterError::InvalidResponse(_) => {
            (StatusCode::BAD_GATEWAY, None)
        }
        RouterError::ClassifierUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, None),
        RouterError::UnsupportedIntent(name) => {
            (StatusCode::BAD_REQUEST, Some(json!({ "intent": name })))
        }
        RouterError::UnknownTool(name) => (StatusCode::BAD_REQUEST, Some(json!({ "tool": name }))),
        RouterError::InvalidParameters(_) => (StatusCode::BAD_REQUEST, None),
    };
    (status, Json(error_body(err.code(), err.to_string(), data))).into_response()
}

/// Provider body, byte for byte.
fn passthrough(body: ProviderBody) -> Response {
    let content_type = body
        .content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    ([(header::CONTENT_TYPE, content_type)], body.bytes).into_response()
}

async fn forward(state: &AppState, request: SearchRequest) -> Response {
    let intent = request.intent();
    match state.backend.search(&request).await {
        Ok(body) => {
            info!(%intent, bytes = body.bytes.len(), "search forwarded");
            passthrough(body)
        }
        Err(e) => {
            warn!(%intent, error = %e, "search failed");
            error_response(&e)
        }
    }
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.server_start.elapsed().as_secs(),
    }))
}

/// GET /search/{intent}. The intent segment is case-insensitive; anything
/// outside company/person/job is rejected before any outbound call.
async fn intent_search_handler(
    State(state): State<Arc<AppState>>,
    Path(intent): Path<String>,
    uri: Uri,
) -> Response {
    let intent: Intent = match intent.parse() {
        Ok(intent) => intent,
        Err(e) => return error_response(&e),
    };
    let request = match intent {
        Intent::Company => {
            Query::<CompanySearch>::try_from_uri(&uri).map(|Query(p)| SearchRequest::Company(p))
        }
        Intent::Person => {
            Query::<PersonSearch>::try_from_uri(&uri).map(|Query(p)| SearchRequest::Person(p))
        }
        Intent::Job => Query::<JobSearch>::try_from_uri(&uri).map(|Query(p)| SearchRequest::Job(p)),
    };
    match request {
        Ok(request) => forward(&state, request).await,
        Err(e) => invalid_input(e.body_text()),
    }
}

#[derive(Debug, Deserialize)]
struct RoutedSearchQuery {
    #[serde(default)]
    q: Option<String>,
}

/// GET /search?q=: classify, then forward.
async fn routed_search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoutedSearchQuery>,
) -> Response {
    let Some(text) = query.q.filter(|q| !q.trim().is_empty()) else {
        return invalid_input("missing query parameter `q`");
    };

    match prospect_tools::route_query(state.classifier.as_ref(), state.backend.as_ref(), &text)
        .await
    {
        Ok(routed) => {
            let mut response = passthrough(routed.body);
            let headers = response.headers_mut();
            headers.insert(
                constants::HEADER_INTENT,
                HeaderValue::from_static(routed.classification.intent().as_str()),
            );
            headers.insert(
                constants::HEADER_FALLBACK,
                HeaderValue::from_static(if routed.classification.is_fallback() {
                    "true"
                } else {
                    "false"
                }),
            );
            response
        }
        Err(e) => {
            warn!(error = %e, "routed search failed");
            error_response(&e)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    query: String,
}

/// POST /classify
async fn classify_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ClassifyRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return invalid_input(format!("Invalid JSON request body: {}", e)),
    };

    match state.classifier.classify(&request.query).await {
        Ok(classification) => Json(json!({
            "search_type": classification.intent(),
            "parameters": classification.request.to_query_params(),
            "fallback": classification.is_fallback(),
            "fallback_reason": classification.fallback.as_ref().map(|r| r.to_string()),
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /tools
async fn tools_handler() -> impl IntoResponse {
    Json(json!({ "tools": prospect_tools::list_tools() }))
}

#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// POST /tools/call
async fn tool_call_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ToolCallRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return invalid_input(format!("Invalid JSON request body: {}", e)),
    };

    match prospect_tools::call_tool(state.backend.as_ref(), &request.name, &request.arguments)
        .await
    {
        Ok(value) => Json(value).into_response(),
        Err(e) => error_response(&e),
    }
}
