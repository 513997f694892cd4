//! Deterministic weighted-point scoring of a validated questionnaire.
//!
//! Four independent axes plus one bonus, summed, rounded half-up, and
//! clamped to 10. Pure and total: no I/O, no clock, no missing-case
//! fallthrough. Input validation happens earlier, at the
//! [`QualificationForm`](super::domain::QualificationForm) boundary.

mod rubric;

use serde::{Deserialize, Serialize};

use super::domain::{FollowUpCadence, QualificationAnswers};

/// Score-derived priority bucket driving follow-up speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl ScoreLabel {
    /// Bucket thresholds: Hot >= 8, Warm 6-7, Cool 4-5, Cold < 4.
    ///
    /// These boundaries are the single source of truth for every routing or
    /// cadence decision in the system.
    pub const fn from_score(score: u8) -> Self {
        match score {
            8.. => ScoreLabel::Hot,
            6..=7 => ScoreLabel::Warm,
            4..=5 => ScoreLabel::Cool,
            _ => ScoreLabel::Cold,
        }
    }

    pub const fn cadence(self) -> FollowUpCadence {
        match self {
            ScoreLabel::Hot => FollowUpCadence::ImmediateHandOff,
            ScoreLabel::Warm => FollowUpCadence::ScheduledCallback,
            ScoreLabel::Cool | ScoreLabel::Cold => FollowUpCadence::NurtureSequence,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreLabel::Hot => "hot",
            ScoreLabel::Warm => "warm",
            ScoreLabel::Cool => "cool",
            ScoreLabel::Cold => "cold",
        }
    }
}

/// Output of the structured scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub label: ScoreLabel,
}

/// Score a validated questionnaire.
///
/// The axis maxima sum to exactly 10, so the clamp only matters if the
/// rubric weights change. Rounding is half-up (7.5 rounds to 8).
pub fn score(answers: &QualificationAnswers) -> ScoreResult {
    let total = rubric::weight_sum(answers);
    // f32::round is half-away-from-zero; all weights are non-negative so
    // this is exactly half-up.
    let score = total.round().clamp(0.0, 10.0) as u8;

    ScoreResult {
        score,
        label: ScoreLabel::from_score(score),
    }
}
