//! Safety report assembled from a scored batch, and the regional figures
//! handed to the consultation forecasting model

use serde::Serialize;

use crate::domain::{
    ForecastFeatures, RecallBatch, RiskForecaster, SafetyBand, ScoredRecall, count_zone_occurrences,
    forecast_weekly_consultations, safety_index,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub scored: Vec<ScoredRecall>,
    pub index: f64,
    pub band: SafetyBand,
}

impl RiskReport {
    pub fn from_scored(scored: Vec<ScoredRecall>) -> Self {
        let index = safety_index(&scored);
        Self {
            band: SafetyBand::classify(index),
            index,
            scored,
        }
    }

    /// Riskiest recalls first
    pub fn ranked(&self) -> Vec<&ScoredRecall> {
        let mut ranked: Vec<&ScoredRecall> = self.scored.iter().collect();
        ranked.sort_by_key(|recall| recall.score);
        ranked
    }
}

/// Model inputs for one region, measured on an ingested batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionOutlook {
    pub region: String,
    pub occurrences: usize,
    pub features: ForecastFeatures,
}

impl RegionOutlook {
    pub fn from_batch(batch: &RecallBatch, region: &str, region_encoded: i64, year: i32, uhii: f64, co2: f64) -> Self {
        let occurrences = count_zone_occurrences(batch, region);
        Self {
            region: region.trim().to_string(),
            occurrences,
            features: ForecastFeatures::from_occurrences(region_encoded, year, occurrences, uhii, co2),
        }
    }

    /// Expected consultations next week according to `model`
    pub fn forecast(&self, model: &dyn RiskForecaster) -> anyhow::Result<i64> {
        forecast_weekly_consultations(model, &self.features)
    }
}
