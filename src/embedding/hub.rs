//! Model file resolution.
//!
//! A model is either a local directory or a Hugging Face hub id. Hub models are
//! read from the local hub cache when all files are present there, and only
//! downloaded otherwise, so a warm cache never touches the network.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Cache, Repo, RepoType};
use tracing::{debug, info};

use crate::constants::{MODEL_CONFIG_FILE, MODEL_TOKENIZER_FILE, MODEL_WEIGHTS_FILE};
use crate::embedding::error::EmbeddingError;

/// Where the sentence-transformer weights come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Directory with `config.json`, `tokenizer.json` and `model.safetensors`.
    Local(PathBuf),
    /// Hugging Face model id, optionally with a non-default cache directory.
    Hub {
        model_id: String,
        cache_dir: Option<PathBuf>,
    },
}

impl ModelSource {
    /// Identifier reported alongside every grade.
    pub fn model_name(&self) -> String {
        match self {
            ModelSource::Local(dir) => dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string()),
            ModelSource::Hub { model_id, .. } => model_id.clone(),
        }
    }
}

/// Paths to the three files a sentence-transformer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Locates the model files for `source`, downloading them if necessary.
    pub fn resolve(source: &ModelSource) -> Result<Self, EmbeddingError> {
        match source {
            ModelSource::Local(dir) => Self::in_dir(dir),
            ModelSource::Hub {
                model_id,
                cache_dir,
            } => Self::from_hub(model_id, cache_dir.as_deref()),
        }
    }

    /// Uses the files in `dir`; all three must exist.
    pub fn in_dir(dir: &Path) -> Result<Self, EmbeddingError> {
        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: dir.to_path_buf(),
            });
        }

        let files = Self {
            config: dir.join(MODEL_CONFIG_FILE),
            tokenizer: dir.join(MODEL_TOKENIZER_FILE),
            weights: dir.join(MODEL_WEIGHTS_FILE),
        };

        for path in [&files.config, &files.tokenizer, &files.weights] {
            if !path.is_file() {
                return Err(EmbeddingError::ModelNotFound { path: path.clone() });
            }
        }

        Ok(files)
    }

    /// Returns the cached files for `model_id` if every one is already on disk.
    pub fn from_cache(model_id: &str, cache_dir: Option<&Path>) -> Option<Self> {
        let cache = match cache_dir {
            Some(dir) => Cache::new(dir.to_path_buf()),
            None => Cache::default(),
        };
        let repo = cache.repo(Repo::new(model_id.to_string(), RepoType::Model));

        Some(Self {
            config: repo.get(MODEL_CONFIG_FILE)?,
            tokenizer: repo.get(MODEL_TOKENIZER_FILE)?,
            weights: repo.get(MODEL_WEIGHTS_FILE)?,
        })
    }

    fn from_hub(model_id: &str, cache_dir: Option<&Path>) -> Result<Self, EmbeddingError> {
        if let Some(files) = Self::from_cache(model_id, cache_dir) {
            debug!(model_id, "Using cached model files");
            return Ok(files);
        }

        info!(model_id, "Model not cached, downloading from Hugging Face hub");

        let download_failed = |reason: String| EmbeddingError::DownloadFailed {
            model_id: model_id.to_string(),
            reason,
        };

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir.to_path_buf());
        }
        let api = builder.build().map_err(|e| download_failed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let fetch = |file: &str| {
            repo.get(file)
                .map_err(|e| download_failed(format!("{file}: {e}")))
        };

        let files = Self {
            config: fetch(MODEL_CONFIG_FILE)?,
            tokenizer: fetch(MODEL_TOKENIZER_FILE)?,
            weights: fetch(MODEL_WEIGHTS_FILE)?,
        };

        info!(model_id, weights = %files.weights.display(), "Model files downloaded");
        Ok(files)
    }
}
