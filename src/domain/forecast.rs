//! Feature vector handed to the consultation forecasting model

use serde::{Deserialize, Serialize};

use super::recall::RecallBatch;
use super::services::RiskForecaster;

/// Weeks per year; scales a weekly occurrence count to the model's yearly unit
pub const WEEKLY_SCALING: f64 = 52.14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastFeatures {
    #[serde(rename = "regionEncoded")]
    pub region_encoded: i64,
    pub year: i32,
    #[serde(rename = "countRiskWeighted")]
    pub count_risk_weighted: f64,
    pub uhii: f64,
    pub co2: f64,
}

impl ForecastFeatures {
    pub fn from_occurrences(region_encoded: i64, year: i32, occurrences: usize, uhii: f64, co2: f64) -> Self {
        Self {
            region_encoded,
            year,
            count_risk_weighted: occurrences as f64 * WEEKLY_SCALING,
            uhii,
            co2,
        }
    }

    /// Values in the column order the model was trained on
    pub fn as_vector(&self) -> [f64; 5] {
        [
            self.region_encoded as f64,
            f64::from(self.year),
            self.count_risk_weighted,
            self.uhii,
            self.co2,
        ]
    }
}

/// Recalls whose sales zone mentions `region` (case-insensitive)
pub fn count_zone_occurrences(batch: &RecallBatch, region: &str) -> usize {
    let needle = region.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    batch
        .iter()
        .filter(|recall| recall.zone.to_lowercase().contains(&needle))
        .count()
}

/// Raw model output brought back to a weekly figure
pub fn weekly_consultations(prediction: f64) -> i64 {
    (prediction / WEEKLY_SCALING).round() as i64
}

/// Run the model on `features` and rescale its output to a weekly figure
pub fn forecast_weekly_consultations(model: &dyn RiskForecaster, features: &ForecastFeatures) -> anyhow::Result<i64> {
    Ok(weekly_consultations(model.predict(features)?))
}
