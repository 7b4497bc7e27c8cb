//! Application layer module
//!
//! Run settings, the paginated ingestion pipeline, zone enrichment and
//! batch scoring. These orchestrate the domain logic over the collaborator
//! traits; concrete collaborators are wired in by the binary.

pub mod ingestion;
pub mod report;
pub mod scoring;
pub mod settings;
pub mod zone_resolver;

pub use ingestion::{IngestionStats, PageVerdict, RecallIngestionPipeline};
pub use report::{RegionOutlook, RiskReport};
pub use scoring::{FALLBACK_SCORE, ProgressSchedule, RiskScoringOrchestrator, score_or_default};
pub use settings::{PipelineSettings, RunMode};
pub use zone_resolver::{ZoneResolver, zone_or_default};
