use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXCELLENT_THRESHOLD, DEFAULT_PARTIAL_THRESHOLD, GRADE_DECIMALS};

use super::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Qualitative feedback category for a grade.
pub enum Band {
    Excellent,
    Partial,
    Poor,
}

impl Band {
    /// Stable wire name (`EXCELLENT`, `PARTIAL`, `POOR`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Excellent => "EXCELLENT",
            Band::Partial => "PARTIAL",
            Band::Poor => "POOR",
        }
    }

    /// Short human label.
    pub fn label(&self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Partial => "Partial",
            Band::Poor => "Poor",
        }
    }

    /// Feedback sentence shown next to the grade.
    pub fn feedback(&self) -> &'static str {
        match self {
            Band::Excellent => "Excellent! The meaning matches perfectly.",
            Band::Partial => "Good attempt, but missed some key context.",
            Band::Poor => "The answer is incorrect or irrelevant.",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A similarity expressed as a percentage and its band.
pub struct Grade {
    /// `round(similarity * 100, 2)`; negative for opposed embeddings.
    pub percentage: f64,
    pub band: Band,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/100 ({})", self.percentage, self.band)
    }
}

/// Band thresholds (inclusive lower bounds on the percentage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingPolicy {
    excellent_at: f64,
    partial_at: f64,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            excellent_at: DEFAULT_EXCELLENT_THRESHOLD,
            partial_at: DEFAULT_PARTIAL_THRESHOLD,
        }
    }
}

impl GradingPolicy {
    /// Both thresholds must be finite with `partial_at < excellent_at`.
    pub fn new(excellent_at: f64, partial_at: f64) -> Result<Self, ScoringError> {
        if !excellent_at.is_finite() || !partial_at.is_finite() {
            return Err(ScoringError::InvalidPolicy {
                reason: "thresholds must be finite".to_string(),
            });
        }

        if partial_at >= excellent_at {
            return Err(ScoringError::InvalidPolicy {
                reason: format!(
                    "partial threshold ({partial_at}) must be below excellent threshold ({excellent_at})"
                ),
            });
        }

        Ok(Self {
            excellent_at,
            partial_at,
        })
    }

    pub fn excellent_at(&self) -> f64 {
        self.excellent_at
    }

    pub fn partial_at(&self) -> f64 {
        self.partial_at
    }

    /// Total over all inputs; NaN falls through to [`Band::Poor`].
    pub fn band_for(&self, percentage: f64) -> Band {
        if percentage >= self.excellent_at {
            Band::Excellent
        } else if percentage >= self.partial_at {
            Band::Partial
        } else {
            Band::Poor
        }
    }

    /// Maps a similarity to its percentage and band.
    pub fn grade(&self, similarity: f64) -> Grade {
        let percentage = to_percentage(similarity);
        Grade {
            percentage,
            band: self.band_for(percentage),
        }
    }
}

/// `round(similarity * 100, 2)`.
pub fn to_percentage(similarity: f64) -> f64 {
    round_to(similarity * 100.0, GRADE_DECIMALS)
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Grades with the default 85 / 60 thresholds.
pub fn grade(similarity: f64) -> Grade {
    GradingPolicy::default().grade(similarity)
}
