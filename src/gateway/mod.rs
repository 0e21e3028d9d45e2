//! HTTP gateway (axum): the evaluation form, a JSON API, and health probes.

pub mod error;
pub mod handler;
pub mod payload;
pub mod render;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{evaluate_form_handler, evaluate_json_handler, index_handler};
pub use payload::{EvaluateRequest, EvaluateResponse, EvaluationDetails};
pub use state::HandlerState;

use crate::embedding::EmbeddingProvider;

/// Response header reporting what the request did.
pub const STATUS_HEADER: &str = "X-Semgrade-Status";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
/// Page rendered with no result.
pub const STATUS_IDLE: &str = "idle";
/// A grade was computed.
pub const STATUS_EVALUATED: &str = "evaluated";

pub fn create_router_with_state<P>(state: HandlerState<P>) -> Router
where
    P: EmbeddingProvider + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/evaluate", post(evaluate_form_handler))
        .route("/v1/evaluate", post(evaluate_json_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ComponentStatus {
    pub http: String,
    pub embedding: String,
    pub embedder_mode: String,
    pub model: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// The provider is loaded before the router exists, so a served request is a ready one.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<P>(State(state): State<HandlerState<P>>) -> Response
where
    P: EmbeddingProvider + 'static,
{
    let embedder_mode = if state.is_stub() { "stub" } else { "real" };

    let components = ComponentStatus {
        http: STATUS_READY.to_string(),
        embedding: STATUS_READY.to_string(),
        embedder_mode: embedder_mode.to_string(),
        model: state.model_name().to_string(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_READY));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok".to_string(),
            components,
        }),
    )
        .into_response()
}
