use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::DEGENERATE_FALLBACK_SIMILARITY;
use crate::embedding::Embedding;

use super::error::ScoringError;

/// Which side of a comparison had a zero-norm embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateInput {
    Reference,
    Candidate,
    Both,
}

impl std::fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateInput::Reference => write!(f, "reference answer"),
            DegenerateInput::Candidate => write!(f, "candidate answer"),
            DegenerateInput::Both => write!(f, "reference and candidate answers"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Cosine similarity plus the zero-norm fallback marker, if it was applied.
pub struct Similarity {
    /// In `[-1, 1]`.
    pub value: f64,
    /// Set when the fallback value was substituted.
    pub degenerate: Option<DegenerateInput>,
}

impl Similarity {
    pub fn is_degenerate(&self) -> bool {
        self.degenerate.is_some()
    }
}

/// `dot(a, b) / (|a| * |b|)`, accumulated in `f64`.
///
/// A zero-norm side yields [`DEGENERATE_FALLBACK_SIMILARITY`] with
/// [`Similarity::degenerate`] set instead of NaN. Empty slices count as zero-norm.
pub fn cosine_similarity(reference: &[f32], candidate: &[f32]) -> Result<Similarity, ScoringError> {
    if reference.len() != candidate.len() {
        return Err(ScoringError::DimensionMismatch {
            reference: reference.len(),
            candidate: candidate.len(),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) = reference.iter().zip(candidate.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&a, &b)| {
            let (a, b) = (f64::from(a), f64::from(b));
            (dot + a * b, na + a * a, nb + b * b)
        },
    );

    if !(dot.is_finite() && norm_a_sq.is_finite() && norm_b_sq.is_finite()) {
        return Err(ScoringError::NonFinite);
    }

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    let degenerate = match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => Some(DegenerateInput::Both),
        (true, false) => Some(DegenerateInput::Reference),
        (false, true) => Some(DegenerateInput::Candidate),
        (false, false) => None,
    };

    if let Some(which) = degenerate {
        warn!(
            input = %which,
            fallback = DEGENERATE_FALLBACK_SIMILARITY,
            "Zero-norm embedding, substituting fallback similarity"
        );
        return Ok(Similarity {
            value: DEGENERATE_FALLBACK_SIMILARITY,
            degenerate: Some(which),
        });
    }

    // Rounding can push identical unit vectors just past 1.0.
    let value = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);

    Ok(Similarity {
        value,
        degenerate: None,
    })
}

/// Scores two embeddings, rejecting pairs produced by different models.
pub fn score_embeddings(
    reference: &Embedding,
    candidate: &Embedding,
) -> Result<Similarity, ScoringError> {
    if reference.model() != candidate.model() {
        return Err(ScoringError::ModelMismatch {
            reference: reference.model().to_string(),
            candidate: candidate.model().to_string(),
        });
    }

    cosine_similarity(reference.values(), candidate.values())
}
