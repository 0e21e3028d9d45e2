//! Semgrade library crate (used by the server binary and integration tests).
//!
//! Grades a candidate answer against a reference answer by meaning: both texts
//! are embedded with a sentence-embedding model, their cosine similarity becomes
//! a percentage, and the percentage falls into one of three feedback bands.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`EmbeddingProvider`], [`SentenceEmbedder`], [`SentenceConfig`] - Text embedding
//! - [`cosine_similarity`], [`GradingPolicy`], [`Band`], [`Grade`] - Scoring
//! - [`Evaluator`], [`EvaluationSession`], [`AnswerPair`], [`Evaluation`] - The evaluation workflow
//! - [`gateway`] - HTTP form, JSON API and health probes
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluation;
pub mod gateway;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use embedding::{
    DevicePreference, Embedding, EmbeddingError, EmbeddingProvider, ModelSource, SentenceConfig,
    SentenceEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MOCK_MODEL_NAME, MockEmbedder};
pub use evaluation::{
    AnswerPair, Evaluation, EvaluationError, EvaluationSession, EvaluationWarning, Evaluator,
    MissingInput, ValidationError, WorkflowState,
};
pub use scoring::{
    Band, DegenerateInput, Grade, GradingPolicy, ScoringError, Similarity, cosine_similarity,
    grade,
};
