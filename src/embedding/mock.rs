//! Scriptable provider for tests.

use std::collections::HashMap;

use super::error::EmbeddingError;
use super::provider::{Embedding, EmbeddingProvider};
use super::sentence::normalize;

/// Model name reported by [`MockEmbedder`].
pub const MOCK_MODEL_NAME: &str = "mock-embedder";

/// Provider returning fixed vectors per text.
///
/// Texts without a fixed vector get a one-hot vector at `len % dim`. Equal
/// texts always match, and so do any two texts whose lengths agree modulo `dim`. Texts registered with [`fail_on`](Self::fail_on)
/// return an inference error.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
    failures: HashMap<String, String>,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    /// Returns `vector` verbatim (not normalized) for `text`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Makes encoding `text` fail with `reason`.
    pub fn fail_on(mut self, text: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(text.into(), reason.into());
        self
    }
}

impl EmbeddingProvider for MockEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if let Some(reason) = self.failures.get(text) {
            return Err(EmbeddingError::InferenceFailed {
                reason: reason.clone(),
            });
        }

        let values = match self.vectors.get(text) {
            Some(v) => v.clone(),
            None => {
                let mut v = vec![0.0; self.dim];
                if self.dim > 0 {
                    v[text.len() % self.dim] = 1.0;
                }
                normalize(v)
            }
        };

        Ok(Embedding::new(values, MOCK_MODEL_NAME))
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL_NAME
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn is_stub(&self) -> bool {
        true
    }
}
