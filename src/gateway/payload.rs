use serde::{Deserialize, Serialize};

use crate::evaluation::{AnswerPair, Evaluation};
use crate::scoring::Band;

/// Body of `POST /v1/evaluate`, also the form fields of `POST /evaluate`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub candidate: String,
}

impl From<EvaluateRequest> for AnswerPair {
    fn from(req: EvaluateRequest) -> Self {
        AnswerPair::new(req.reference, req.candidate)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvaluateResponse {
    /// Percentage, two decimal places.
    pub grade: f64,
    pub band: Band,
    pub label: String,
    pub feedback: String,
    pub details: EvaluationDetails,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvaluationDetails {
    pub similarity: f64,
    /// Similarity to four decimal places.
    pub similarity_display: String,
    pub model: String,
    pub warnings: Vec<String>,
}

impl From<Evaluation> for EvaluateResponse {
    fn from(evaluation: Evaluation) -> Self {
        let band = evaluation.band();
        Self {
            grade: evaluation.percentage(),
            band,
            label: band.label().to_string(),
            feedback: band.feedback().to_string(),
            details: EvaluationDetails {
                similarity: evaluation.similarity,
                similarity_display: evaluation.similarity_display(),
                warnings: evaluation.warnings.iter().map(ToString::to_string).collect(),
                model: evaluation.model,
            },
        }
    }
}
