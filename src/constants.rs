//! Cross-cutting, shared constants.
//!
//! The grading thresholds here are the defaults for [`GradingPolicy`](crate::scoring::GradingPolicy);
//! the embedding values describe the default sentence-transformer.

/// Hugging Face model id loaded when no local model directory is configured.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of the default model (and of the stub embedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token limit of the default model; longer inputs are truncated.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Model name reported by the stub embedder.
pub const STUB_MODEL_NAME: &str = "stub-hash-embedder";

/// Lowest percentage (inclusive) graded EXCELLENT.
pub const DEFAULT_EXCELLENT_THRESHOLD: f64 = 85.0;

/// Lowest percentage (inclusive) graded PARTIAL.
pub const DEFAULT_PARTIAL_THRESHOLD: f64 = 60.0;

/// Decimal places kept in a grade percentage.
pub const GRADE_DECIMALS: u32 = 2;

/// Decimal places shown for the raw similarity in the details panel.
pub const SIMILARITY_DISPLAY_DECIMALS: usize = 4;

/// Similarity substituted when either embedding has zero norm.
pub const DEGENERATE_FALLBACK_SIMILARITY: f64 = 0.0;

/// Files a sentence-transformer directory must contain.
pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_TOKENIZER_FILE: &str = "tokenizer.json";
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
