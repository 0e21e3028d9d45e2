//! Evaluation workflow: validate two answers, embed them, grade the similarity.
//!
//! [`Evaluator`] is the stateless request/response core. [`EvaluationSession`]
//! wraps it in the two-state (IDLE / EVALUATED) workflow the presentation layer
//! renders.

pub mod error;
pub mod evaluator;
pub mod session;
pub mod types;


pub use error::{EvaluationError, ValidationError};
pub use evaluator::Evaluator;
pub use session::EvaluationSession;
pub use types::{AnswerPair, Evaluation, EvaluationWarning, MissingInput, WorkflowState};
