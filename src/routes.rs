// ABOUTME: HTTP surface for the agent - POST /vmm/health, /vmm/spawn, /vmm/apply
// ABOUTME: Decodes JSON bodies, delegates to AgentServer and maps failures to 400s

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use vmdocker_runtime::{ApplyRequest, SpawnRequest};

use crate::{
    error::AgentError,
    metrics,
    server::{AgentServer, HealthResponse},
};

/// Body of a successful spawn or apply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub status: String,
    /// Encoded ApplyResult, passed through as an opaque string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl OkResponse {
    fn ok(result: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            result,
        }
    }
}

/// Build the agent router. `/metrics` is mounted only when a Prometheus
/// handle is supplied.
///
/// Spawn payloads carry whole modules in `initData`, so the `/vmm` routes
/// have no body size cap.
pub fn router(server: Arc<AgentServer>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let vmm_routes = Router::new()
        .route("/health", post(health_handler))
        .route("/spawn", post(spawn_handler))
        .route("/apply", post(apply_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(server);

    let mut app = Router::new().nest("/vmm", vmm_routes);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(Arc::new(handle));
        app = app.merge(metrics_routes);
    }

    app.layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process exits
pub async fn serve(
    addr: &str,
    server: Arc<AgentServer>,
    metrics_handle: Option<PrometheusHandle>,
) -> Result<()> {
    let app = router(server, metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Agent server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Decode a JSON body regardless of its Content-Type header
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AgentError> {
    Ok(serde_json::from_slice(body)?)
}

async fn health_handler(State(server): State<Arc<AgentServer>>) -> Json<HealthResponse> {
    Json(server.health())
}

async fn spawn_handler(
    State(server): State<Arc<AgentServer>>,
    body: Bytes,
) -> Result<Json<OkResponse>, AgentError> {
    // The second spawn is refused before the body is looked at
    if server.is_spawned().await {
        tracing::warn!("Spawn rejected: runtime already exists");
        metrics::record_spawn("already_spawned");
        return Err(AgentError::RuntimeNotNil);
    }

    let request: SpawnRequest = decode_body(&body).map_err(|e| {
        tracing::warn!(error = %e, "Spawn request rejected: invalid body");
        metrics::record_spawn("bad_request");
        e
    })?;

    match server.spawn(&request).await {
        Ok(()) => {
            metrics::record_spawn("ok");
            Ok(Json(OkResponse::ok(None)))
        }
        Err(e) => {
            tracing::warn!(error = %e, pid = %request.pid, "Spawn failed");
            metrics::record_spawn(match &e {
                AgentError::RuntimeNotNil => "already_spawned",
                AgentError::Runtime(inner) => inner.kind(),
                _ => "failed",
            });
            Err(e)
        }
    }
}

async fn apply_handler(
    State(server): State<Arc<AgentServer>>,
    body: Bytes,
) -> Result<Json<OkResponse>, AgentError> {
    if !server.is_spawned().await {
        tracing::warn!("Apply rejected: no runtime spawned");
        metrics::record_apply("runtime_nil");
        return Err(AgentError::RuntimeNil);
    }

    let request: ApplyRequest = decode_body(&body).map_err(|e| {
        tracing::warn!(error = %e, "Apply request rejected: invalid body");
        metrics::record_apply("bad_request");
        e
    })?;

    let started = Instant::now();
    let outcome = server
        .apply(&request.from, &request.meta, request.params.as_ref())
        .await;
    metrics::record_apply_duration(started.elapsed());

    match outcome {
        Ok(result) => {
            metrics::record_apply("ok");
            Ok(Json(OkResponse::ok(Some(result))))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                from = %request.from,
                action = %request.meta.action,
                sequence = request.meta.sequence,
                "Apply failed"
            );
            metrics::record_apply("failed");
            Err(e)
        }
    }
}

async fn metrics_handler(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}
