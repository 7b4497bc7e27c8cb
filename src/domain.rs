//! Domain module - recall records, date windows and the safety index
//!
//! Everything in here is pure: no network, no filesystem. The collaborator
//! traits the application layer drives are declared in [`services`].

pub mod date_window;
pub mod errors;
pub mod forecast;
pub mod recall;
pub mod safety_index;
pub mod services;

// Re-export commonly used items for convenience
pub use date_window::{DateVerdict, DateWindow, RECALL_DATE_FORMAT, parse_recall_date};
pub use errors::{RecallError, RecallResult};
pub use forecast::{
    ForecastFeatures, WEEKLY_SCALING, count_zone_occurrences, forecast_weekly_consultations, weekly_consultations,
};
pub use recall::{CsvRecallRow, EnrichedRecall, RawRecall, RecallBatch, ScoredRecall, TITLE_PLACEHOLDER};
pub use safety_index::{EMPTY_BATCH_INDEX, SafetyBand, safety_index};
pub use services::{PageFetcher, ProgressSink, RecallSink, RiskForecaster, ScoringOracle};
