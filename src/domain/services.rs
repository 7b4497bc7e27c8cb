//! Collaborator interfaces driven by the application layer
//!
//! Network collaborators are async and `Send + Sync` so they can be shared
//! behind an `Arc` between the pagination driver and the zone resolver.

use async_trait::async_trait;

use super::errors::RecallResult;
use super::forecast::ForecastFeatures;
use super::recall::CsvRecallRow;

/// GET a page and return its body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of a 200 response; any other status is `RecallError::HttpStatus`,
    /// a network failure is `RecallError::Transport`
    async fn fetch(&self, url: &str) -> RecallResult<String>;
}

/// Chat-style language model used to score recalls
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> RecallResult<String>;
}

/// Receives percentage updates while a batch is scored
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent);
    }
}

/// Persistence collaborator for the flat CSV projection
pub trait RecallSink {
    fn write_rows(&mut self, rows: &[CsvRecallRow]) -> anyhow::Result<()>;
}

/// Pre-trained consultation model
pub trait RiskForecaster {
    fn predict(&self, features: &ForecastFeatures) -> anyhow::Result<f64>;
}
