use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::scoring::ScoringError;

use super::types::MissingInput;

/// One or both answers were empty when evaluation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .missing.message())]
pub struct ValidationError {
    pub missing: MissingInput,
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

impl EvaluationError {
    /// Returns `true` if the request was rejected before any embedding work.
    pub fn is_validation(&self) -> bool {
        matches!(self, EvaluationError::Validation(_))
    }
}
