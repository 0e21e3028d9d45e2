use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding dimensions differ: reference has {reference}, candidate has {candidate}")]
    DimensionMismatch { reference: usize, candidate: usize },

    #[error("embeddings come from different models: '{reference}' vs '{candidate}'")]
    ModelMismatch { reference: String, candidate: String },

    #[error("embedding contains non-finite values")]
    NonFinite,

    #[error("invalid grading policy: {reason}")]
    InvalidPolicy { reason: String },
}
