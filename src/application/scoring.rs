//! Risk scoring of an ingested batch
//!
//! One oracle call per recall, in batch order. A call that fails or answers
//! anything but an integer in `0..=100` scores [`FALLBACK_SCORE`].

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{ProgressSink, RecallBatch, RecallError, RecallResult, ScoredRecall, ScoringOracle};

pub const SYSTEM_PROMPT: &str = "You are a food safety expert. You will receive a recall announcement in French. \
Determine how risky it is in terms of food safety, from 0 to 100. \
0 means extremely dangerous; 100 means perfectly safe or irrelevant. \
Output ONLY the integer (no additional text).";

/// Score given to a recall the oracle could not rate
pub const FALLBACK_SCORE: u8 = 100;

pub fn user_message(summary: &str) -> String {
    format!("{summary}\n\nOutput the risk score (0-100) only.")
}

/// Trimmed oracle answer as a score in `0..=100`
pub fn parse_score(answer: &str) -> RecallResult<u8> {
    let trimmed = answer.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| RecallError::scoring(format!("not an integer: {trimmed:?}")))?;
    u8::try_from(value)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| RecallError::scoring(format!("score {value} outside 0..=100")))
}

pub fn score_or_default(outcome: RecallResult<String>) -> u8 {
    match outcome.and_then(|answer| parse_score(&answer)) {
        Ok(score) => score,
        Err(e) => {
            warn!("⚠️  Scoring failed, using {}: {}", FALLBACK_SCORE, e);
            FALLBACK_SCORE
        }
    }
}

/// Percentages reported while a batch of `total` recalls is scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSchedule {
    step: f64,
}

impl ProgressSchedule {
    /// Reported before the first recall
    pub const START: u8 = 10;

    pub fn new(total: usize) -> Self {
        let step = if total == 0 { 90.0 } else { 90.0 / total as f64 };
        Self { step }
    }

    /// Percentage after the recall at 0-based `index`
    pub fn after(&self, index: usize) -> u8 {
        let advanced = f64::from(Self::START) + (self.step * (index + 1) as f64).floor();
        advanced.min(100.0) as u8
    }
}

pub struct RiskScoringOrchestrator {
    oracle: Arc<dyn ScoringOracle>,
}

impl RiskScoringOrchestrator {
    pub fn new(oracle: Arc<dyn ScoringOracle>) -> Self {
        Self { oracle }
    }

    /// Score every recall in order; the output has one entry per input record
    pub async fn score_batch(&self, batch: &RecallBatch, progress: &mut dyn ProgressSink) -> Vec<ScoredRecall> {
        let schedule = ProgressSchedule::new(batch.len());
        progress.report(ProgressSchedule::START);

        let mut scored = Vec::with_capacity(batch.len());
        for (index, recall) in batch.iter().enumerate() {
            let answer = self.oracle.complete(SYSTEM_PROMPT, &user_message(&recall.summary())).await;
            let score = score_or_default(answer);
            debug!("Scored '{}': {}", recall.recall.title, score);

            scored.push(ScoredRecall::from_enriched(recall, score));
            progress.report(schedule.after(index));
        }

        info!("🧮 Scored {} recalls", scored.len());
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Some(42))]
    #[case("  7 \n", Some(7))]
    #[case("0", Some(0))]
    #[case("100", Some(100))]
    #[case("101", None)]
    #[case("-3", None)]
    #[case("42.5", None)]
    #[case("Score: 42", None)]
    #[case("", None)]
    fn answers_are_parsed_strictly(#[case] answer: &str, #[case] expected: Option<u8>) {
        assert_eq!(parse_score(answer).ok(), expected);
    }

    #[test]
    fn failures_default_to_one_hundred() {
        assert_eq!(score_or_default(Err(RecallError::scoring("timeout"))), 100);
        assert_eq!(score_or_default(Ok("dangereux".into())), 100);
        assert_eq!(score_or_default(Ok(" 15 ".into())), 15);
    }

    #[test]
    fn user_message_appends_instruction() {
        assert_eq!(
            user_message("Jambon. Risks: Listeria. Motif: Présence"),
            "Jambon. Risks: Listeria. Motif: Présence\n\nOutput the risk score (0-100) only."
        );
    }

    #[test]
    fn schedule_for_four_records() {
        let schedule = ProgressSchedule::new(4);
        let reports: Vec<u8> = (0..4).map(|i| schedule.after(i)).collect();
        assert_eq!(reports, vec![32, 55, 77, 100]);
    }

    proptest! {
        #[test]
        fn any_answer_scores_within_range(answer in ".*") {
            let score = score_or_default(Ok(answer));
            prop_assert!(score <= 100);
        }

        #[test]
        fn any_integer_answer_scores_within_range(value in any::<i64>()) {
            let score = score_or_default(Ok(value.to_string()));
            prop_assert!(score <= 100);
            if (0..=100).contains(&value) {
                prop_assert_eq!(i64::from(score), value);
            } else {
                prop_assert_eq!(score, FALLBACK_SCORE);
            }
        }

        #[test]
        fn progress_never_decreases_nor_exceeds_one_hundred(total in 1usize..500) {
            let schedule = ProgressSchedule::new(total);
            let mut last = ProgressSchedule::START;
            for index in 0..total {
                let current = schedule.after(index);
                prop_assert!(current >= last);
                prop_assert!(current <= 100);
                last = current;
            }
        }
    }
}
