//! Similarity scoring and the grading policy.
//!
//! [`cosine_similarity`] compares two embeddings; [`GradingPolicy::grade`] turns the
//! result into a percentage and a [`Band`]. Both are pure.
//!
//! # Negative similarity
//!
//! Cosine similarity ranges over `[-1, 1]`, so a grade can be negative. Grades are
//! not clamped here; callers that display grades decide how to present them.

pub mod error;
pub mod grading;
pub mod similarity;


pub use error::ScoringError;
pub use grading::{Band, Grade, GradingPolicy, grade, round_to, to_percentage};
pub use similarity::{DegenerateInput, Similarity, cosine_similarity, score_embeddings};
