use super::error::EmbeddingError;

/// A vector produced by one provider for one text.
///
/// Embeddings carry the name of the model that produced them; vectors from
/// different models are not comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
    model: String,
}

impl Embedding {
    pub fn new(values: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            values,
            model: model.into(),
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Euclidean norm, accumulated in `f64`.
    pub fn norm(&self) -> f64 {
        self.values
            .iter()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum::<f64>()
            .sqrt()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Turns text into embeddings.
///
/// Implementations are constructed once and shared read-only; `encode` must not
/// mutate shared state.
pub trait EmbeddingProvider: Send + Sync {
    /// Encodes one text. Deterministic for a fixed model and input.
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;

    /// Length of every vector this provider returns.
    fn embedding_dim(&self) -> usize;

    /// `true` when no real model backs this provider.
    fn is_stub(&self) -> bool {
        false
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<P> {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        (**self).encode(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}
