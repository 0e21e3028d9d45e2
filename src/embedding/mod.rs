//! Embedding provider + model utilities.
//!
//! - [`provider`] defines the [`EmbeddingProvider`] seam the evaluator depends on.
//! - [`sentence`] provides the sentence-transformer implementation.
//! - [`hub`] resolves model files from a local directory or the Hugging Face cache.

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Model file resolution and download.
pub mod hub;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Provider trait and embedding vector type.
pub mod provider;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

pub use device::{DevicePreference, select_device};
pub use error::EmbeddingError;
pub use hub::{ModelFiles, ModelSource};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MOCK_MODEL_NAME, MockEmbedder};
pub use provider::{Embedding, EmbeddingProvider};
pub use sentence::{SentenceConfig, SentenceEmbedder};
