use serde::{Deserialize, Serialize};

use crate::constants::SIMILARITY_DISPLAY_DECIMALS;
use crate::scoring::{Band, DegenerateInput, Grade};

use super::error::ValidationError;

/// The two texts being compared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerPair {
    /// The teacher's reference answer.
    pub reference: String,
    /// The student's answer being graded.
    pub candidate: String,
}

impl AnswerPair {
    pub fn new(reference: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            candidate: candidate.into(),
        }
    }

    /// Rejects empty (or whitespace-only) inputs, naming which are missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = match (is_blank(&self.reference), is_blank(&self.candidate)) {
            (false, false) => return Ok(()),
            (true, true) => MissingInput::Both,
            (true, false) => MissingInput::Reference,
            (false, true) => MissingInput::Candidate,
        };

        Err(ValidationError { missing })
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Which input a validation error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInput {
    Reference,
    Candidate,
    Both,
}

impl MissingInput {
    pub fn message(&self) -> &'static str {
        match self {
            MissingInput::Reference => "The reference answer is empty. Please fill it in.",
            MissingInput::Candidate => "The candidate answer is empty. Please fill it in.",
            MissingInput::Both => "Please fill in both the reference and candidate answers.",
        }
    }

    pub fn includes_reference(&self) -> bool {
        matches!(self, MissingInput::Reference | MissingInput::Both)
    }

    pub fn includes_candidate(&self) -> bool {
        matches!(self, MissingInput::Candidate | MissingInput::Both)
    }
}

/// Something a reader of the grade should know about how it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationWarning {
    /// An embedding had zero norm; the fallback similarity was used.
    DegenerateVector { input: DegenerateInput },
    /// The embeddings point apart, so the grade is below zero.
    NegativeSimilarity { similarity: f64 },
}

impl std::fmt::Display for EvaluationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationWarning::DegenerateVector { input } => write!(
                f,
                "The {input} produced a zero-length embedding; similarity was set to 0."
            ),
            EvaluationWarning::NegativeSimilarity { similarity } => write!(
                f,
                "Similarity is negative ({similarity:.4}); the grade is below zero."
            ),
        }
    }
}

/// Result of one successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Raw cosine similarity.
    pub similarity: f64,
    pub grade: Grade,
    /// Identifier of the embedding model used.
    pub model: String,
    pub warnings: Vec<EvaluationWarning>,
}

impl Evaluation {
    pub fn percentage(&self) -> f64 {
        self.grade.percentage
    }

    pub fn band(&self) -> Band {
        self.grade.band
    }

    /// Similarity formatted for the details panel.
    pub fn similarity_display(&self) -> String {
        format!("{:.*}", SIMILARITY_DISPLAY_DECIMALS, self.similarity)
    }

    /// Grade formatted as `NN.NN/100`.
    pub fn grade_display(&self) -> String {
        format!("{:.2}/100", self.grade.percentage)
    }
}

/// Where an [`EvaluationSession`](super::EvaluationSession) stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    /// No result to show.
    #[default]
    Idle,
    /// A result is computed and shown.
    Evaluated(Evaluation),
}

impl WorkflowState {
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::Evaluated(evaluation) => Some(evaluation),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }
}
