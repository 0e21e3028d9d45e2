//! Sentence embedder (BERT sentence-transformer + tokenizer).
//!
//! Use [`SentenceConfig::stub`] for tests/demos without model files.

/// Sentence embedder configuration.
pub mod config;


pub use config::SentenceConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::SentenceBert;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::hub::ModelFiles;
use crate::embedding::provider::{Embedding, EmbeddingProvider};
use crate::embedding::utils::load_sentence_tokenizer;

enum EmbedderBackend {
    Model {
        model: SentenceBert,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Embedding provider backed by a sentence-transformer (supports stub mode).
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
    model_name: String,
    embedding_dim: usize,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_name", &self.model_name)
            .field("embedding_dim", &self.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder. Any failure here is an initialization failure.
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (grades are not meaningful)");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                model_name: config.model_name(),
                embedding_dim: config.embedding_dim,
                config,
            });
        }

        let device = select_device(config.device)?;
        debug!(?device, "Selected compute device for sentence embedder");

        let files = ModelFiles::resolve(&config.source)?;

        let tokenizer = load_sentence_tokenizer(&files.tokenizer, config.max_seq_len).map_err(
            |e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            },
        )?;

        let model =
            SentenceBert::load(&files, &device).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            })?;

        let model_name = config.model_name();
        let embedding_dim = model.hidden_size();

        info!(
            model = %model_name,
            weights = %files.weights.display(),
            embedding_dim,
            num_layers = model.num_layers(),
            max_seq_len = config.max_seq_len,
            "Sentence embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
            model_name,
            embedding_dim,
        })
    }

    /// Convenience for `load(SentenceConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(SentenceConfig::stub())
    }

    /// Generates an L2-normalized embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let raw = match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device)?,
            EmbedderBackend::Stub => self.embed_stub(text),
        };

        Ok(normalize(raw))
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &SentenceBert,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(vec![0.0; self.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = ids.len(),
            "Generating embedding (transformer forward pass)"
        );

        let as_batch = |values: &[u32]| -> Result<Tensor, EmbeddingError> {
            Ok(Tensor::new(values, device)?.unsqueeze(0)?)
        };

        let input_ids = as_batch(ids)?;
        let type_ids = as_batch(encoding.get_type_ids())?;
        let attention_mask = as_batch(encoding.get_attention_mask())?;

        let pooled = model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        let values = pooled
            .squeeze(0)
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Failed to convert embedding to vec: {}", e),
            })?;

        Ok(values)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        (0..self.embedding_dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

impl EmbeddingProvider for SentenceEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(Embedding::new(self.embed(text)?, self.model_name.as_str()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }
}

/// Scales to unit length; the zero vector is returned unchanged.
pub(crate) fn normalize(mut values: Vec<f32>) -> Vec<f32> {
    let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut values {
            *x /= norm;
        }
    }

    values
}
