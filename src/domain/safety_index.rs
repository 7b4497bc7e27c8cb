use serde::{Deserialize, Serialize};

use super::recall::ScoredRecall;

/// Index of a batch with no recalls: no evidence of risk
pub const EMPTY_BATCH_INDEX: f64 = 100.0;

/// Arithmetic mean of the scores, [`EMPTY_BATCH_INDEX`] when there are none
pub fn safety_index(scored: &[ScoredRecall]) -> f64 {
    if scored.is_empty() {
        return EMPTY_BATCH_INDEX;
    }
    let total: u64 = scored.iter().map(|r| u64::from(r.score)).sum();
    total as f64 / scored.len() as f64
}

/// Gauge band of a safety index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyBand {
    Danger,
    Caution,
    Safe,
}

impl SafetyBand {
    pub fn classify(index: f64) -> Self {
        if index < 50.0 {
            Self::Danger
        } else if index < 80.0 {
            Self::Caution
        } else {
            Self::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Caution => "caution",
            Self::Safe => "safe",
        }
    }
}
