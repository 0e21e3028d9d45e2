use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::scoring::{GradingPolicy, score_embeddings};

use super::error::EvaluationError;
use super::types::{AnswerPair, Evaluation, EvaluationWarning};

/// Scores answer pairs with one long-lived embedding provider.
///
/// Holds no per-evaluation state; every call is independent.
pub struct Evaluator<P> {
    provider: P,
    policy: GradingPolicy,
}

impl<P: EmbeddingProvider> std::fmt::Debug for Evaluator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("model", &self.provider.model_name())
            .field("stub", &self.provider.is_stub())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<P: EmbeddingProvider> Evaluator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, GradingPolicy::default())
    }

    pub fn with_policy(provider: P, policy: GradingPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Validates, embeds both answers, and grades their similarity.
    ///
    /// Validation runs before any embedding work. Provider failures are
    /// returned as-is; there is no retry and no partial result.
    pub fn evaluate(&self, answers: &AnswerPair) -> Result<Evaluation, EvaluationError> {
        answers.validate()?;

        debug!(
            reference_len = answers.reference.len(),
            candidate_len = answers.candidate.len(),
            model = self.provider.model_name(),
            "Encoding answers"
        );

        let reference = self.provider.encode(&answers.reference)?;
        let candidate = self.provider.encode(&answers.candidate)?;

        let similarity = score_embeddings(&reference, &candidate)?;
        let grade = self.policy.grade(similarity.value);

        let mut warnings = Vec::new();
        if let Some(input) = similarity.degenerate {
            warnings.push(EvaluationWarning::DegenerateVector { input });
        }
        if similarity.value < 0.0 {
            warn!(
                similarity = similarity.value,
                "Negative similarity, grade will be below zero"
            );
            warnings.push(EvaluationWarning::NegativeSimilarity {
                similarity: similarity.value,
            });
        }

        info!(
            model = self.provider.model_name(),
            similarity = similarity.value,
            percentage = grade.percentage,
            band = %grade.band,
            warnings = warnings.len(),
            "Answer evaluated"
        );

        Ok(Evaluation {
            similarity: similarity.value,
            grade,
            model: self.provider.model_name().to_string(),
            warnings,
        })
    }
}
