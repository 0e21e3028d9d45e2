use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::embedding::EmbeddingProvider;
use crate::evaluation::{AnswerPair, EvaluationSession, WorkflowState};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{EvaluateRequest, EvaluateResponse};
use crate::gateway::render::{PageView, page};
use crate::gateway::state::HandlerState;
use crate::gateway::{STATUS_EVALUATED, STATUS_HEADER, STATUS_IDLE};

/// Runs `work` on the blocking pool while holding the evaluation permit.
async fn run_serialized<P, F, T>(state: &HandlerState<P>, work: F) -> Result<T, GatewayError>
where
    P: EmbeddingProvider + 'static,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let permit = Arc::clone(&state.gate)
        .acquire_owned()
        .await
        .map_err(|e| GatewayError::InternalError(format!("evaluation gate closed: {e}")))?;

    // Owned by the blocking task so a dropped request cannot free it mid-inference.
    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        work()
    })
    .await
    .map_err(|e| GatewayError::InternalError(format!("evaluation task failed: {e}")))
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[instrument(skip(state))]
pub async fn index_handler<P>(State(state): State<HandlerState<P>>) -> Response
where
    P: EmbeddingProvider + 'static,
{
    let html = page(&PageView::idle(state.model_name(), state.is_stub()));
    (StatusCode::OK, status_headers(STATUS_IDLE), Html(html)).into_response()
}

/// Form submission: re-renders the page in the resulting workflow state.
#[instrument(skip(state, form))]
pub async fn evaluate_form_handler<P>(
    State(state): State<HandlerState<P>>,
    Form(form): Form<EvaluateRequest>,
) -> Response
where
    P: EmbeddingProvider + 'static,
{
    let answers = AnswerPair::from(form);

    // Reject before queueing behind a running evaluation.
    let (workflow, failure) = if let Err(e) = answers.validate() {
        (WorkflowState::Idle, Some(GatewayError::from(e)))
    } else {
        let evaluator = Arc::clone(&state.evaluator);
        let submitted = answers.clone();

        let outcome = run_serialized(&state, move || {
            let mut session = EvaluationSession::new(evaluator.as_ref());
            let failure = session.submit(&submitted).err();
            (session.into_state(), failure)
        })
        .await;

        match outcome {
            Ok((workflow, failure)) => (workflow, failure.map(GatewayError::from)),
            Err(e) => (WorkflowState::Idle, Some(e)),
        }
    };

    let (status, header) = match &failure {
        None => (StatusCode::OK, STATUS_EVALUATED),
        Some(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(error = %e, "Evaluation failed");
            } else {
                debug!(error = %e, "Evaluation rejected");
            }
            (e.status_code(), e.status_label())
        }
    };

    let message = failure.as_ref().map(ToString::to_string);
    let html = page(&PageView {
        reference: &answers.reference,
        candidate: &answers.candidate,
        state: &workflow,
        error: message.as_deref(),
        model: state.model_name(),
        stub: state.is_stub(),
    });

    (status, status_headers(header), Html(html)).into_response()
}

/// JSON API: `{reference, candidate}` in, grade and details out.
#[instrument(skip(state, request))]
pub async fn evaluate_json_handler<P>(
    State(state): State<HandlerState<P>>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError>
where
    P: EmbeddingProvider + 'static,
{
    let request: EvaluateRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {e}")))?;
    let answers = AnswerPair::from(request);

    // Reject before queueing behind a running evaluation.
    answers.validate()?;

    let evaluator = Arc::clone(&state.evaluator);
    let evaluation = run_serialized(&state, move || evaluator.evaluate(&answers))
        .await?
        .map_err(GatewayError::from)?;

    info!(
        grade = evaluation.percentage(),
        band = %evaluation.band(),
        "Evaluation served"
    );

    Ok((
        StatusCode::OK,
        status_headers(STATUS_EVALUATED),
        Json(EvaluateResponse::from(evaluation)),
    )
        .into_response())
}
