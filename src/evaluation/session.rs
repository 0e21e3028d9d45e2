use tracing::debug;

use crate::embedding::EmbeddingProvider;

use super::error::EvaluationError;
use super::evaluator::Evaluator;
use super::types::{AnswerPair, Evaluation, WorkflowState};

/// IDLE / EVALUATED state machine around an [`Evaluator`].
///
/// Only [`submit`](Self::submit) moves the session to `Evaluated`, and only when
/// evaluation succeeds. A failed submission leaves the session `Idle`, so an
/// error is never shown next to an older result.
pub struct EvaluationSession<'a, P> {
    evaluator: &'a Evaluator<P>,
    state: WorkflowState,
}

impl<'a, P: EmbeddingProvider> EvaluationSession<'a, P> {
    pub fn new(evaluator: &'a Evaluator<P>) -> Self {
        Self {
            evaluator,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn into_state(self) -> WorkflowState {
        self.state
    }

    pub fn is_evaluated(&self) -> bool {
        !self.state.is_idle()
    }

    /// The "Evaluate" action.
    pub fn submit(&mut self, answers: &AnswerPair) -> Result<Evaluation, EvaluationError> {
        match self.evaluator.evaluate(answers) {
            Ok(evaluation) => {
                debug!("Session transition -> EVALUATED");
                self.state = WorkflowState::Evaluated(evaluation.clone());
                Ok(evaluation)
            }
            Err(e) => {
                debug!(error = %e, "Session transition -> IDLE");
                self.state = WorkflowState::Idle;
                Err(e)
            }
        }
    }

    /// Clears any shown result.
    pub fn reset(&mut self) {
        self.state = WorkflowState::Idle;
    }
}
