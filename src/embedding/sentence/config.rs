use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID, STUB_MODEL_NAME};
use crate::embedding::device::DevicePreference;
use crate::embedding::error::EmbeddingError;
use crate::embedding::hub::ModelSource;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Where the model files come from.
    pub source: ModelSource,
    /// Max tokens per input; longer inputs are truncated.
    pub max_seq_len: usize,
    /// Compute device selection.
    pub device: DevicePreference,
    /// Output dimension in stub mode (a loaded model reports its own).
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            source: ModelSource::Hub {
                model_id: DEFAULT_MODEL_ID.to_string(),
                cache_dir: None,
            },
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            device: DevicePreference::Auto,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for a local model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            source: ModelSource::Local(model_dir.into()),
            ..Default::default()
        }
    }

    /// Creates a config for a hub model id using the default hub cache.
    pub fn from_hub(model_id: impl Into<String>) -> Self {
        Self {
            source: ModelSource::Hub {
                model_id: model_id.into(),
                cache_dir: None,
            },
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// Name reported for embeddings produced under this config.
    pub fn model_name(&self) -> String {
        if self.testing_stub {
            STUB_MODEL_NAME.to_string()
        } else {
            self.source.model_name()
        }
    }

    /// Validates required fields (no network access).
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            if self.embedding_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "embedding_dim must be greater than zero".to_string(),
                });
            }
            return Ok(());
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        match &self.source {
            ModelSource::Local(dir) => {
                if dir.as_os_str().is_empty() {
                    return Err(EmbeddingError::InvalidConfig {
                        reason: "model directory is required (stubbing is disabled)".to_string(),
                    });
                }
                if !dir.exists() {
                    return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
                }
            }
            ModelSource::Hub { model_id, .. } => {
                if model_id.trim().is_empty() {
                    return Err(EmbeddingError::InvalidConfig {
                        reason: "model id cannot be empty".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
