//! Paginated recall ingestion
//!
//! Listing pages are read one after another from page 1. Each page is
//! parsed, filtered against the date window and, when enabled, every kept
//! record is enriched with its sales zone. Pagination ends quietly at the
//! first empty, unparseable or unreachable page; only a failed first page
//! fetch is reported to the caller.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::settings::PipelineSettings;
use super::zone_resolver::ZoneResolver;
use crate::domain::{DateVerdict, EnrichedRecall, PageFetcher, RawRecall, RecallBatch, RecallError, RecallResult};
use crate::infrastructure::parsing::{ParseContext, ParsingConfig, ParsingError, RecallDetailParser, RecallListParser};

/// What one listing page means for pagination
#[derive(Debug)]
pub enum PageVerdict {
    Records(Vec<RawRecall>),
    Empty,
    Unparseable(ParsingError),
    Unreachable(RecallError),
}

impl PageVerdict {
    pub fn should_stop(&self) -> bool {
        !matches!(self, Self::Records(_))
    }

    fn describe(&self) -> String {
        match self {
            Self::Records(records) => format!("{} entries", records.len()),
            Self::Empty => "no recall entries".to_string(),
            Self::Unparseable(e) => format!("unparseable page: {e}"),
            Self::Unreachable(e) => format!("fetch failed: {e}"),
        }
    }
}

/// Counters for the end-of-run summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub pages_read: u32,
    pub entries_seen: usize,
    pub kept: usize,
    pub out_of_window: usize,
    pub undated: usize,
}

pub struct RecallIngestionPipeline {
    settings: PipelineSettings,
    fetcher: Arc<dyn PageFetcher>,
    parser: RecallListParser,
    zones: ZoneResolver,
}

impl RecallIngestionPipeline {
    pub fn new(settings: PipelineSettings, fetcher: Arc<dyn PageFetcher>) -> RecallResult<Self> {
        Self::with_parsing_config(settings, fetcher, &ParsingConfig::default())
    }

    /// Pipeline with custom listing and detail selectors
    pub fn with_parsing_config(
        settings: PipelineSettings,
        fetcher: Arc<dyn PageFetcher>,
        parsing: &ParsingConfig,
    ) -> RecallResult<Self> {
        let detail_parser = RecallDetailParser::with_config(&parsing.detail_selectors)?;
        Ok(Self {
            parser: RecallListParser::with_config(&parsing.list_selectors)?,
            zones: ZoneResolver::with_parser(Arc::clone(&fetcher), detail_parser),
            settings,
            fetcher,
        })
    }

    /// Run the whole page range and return every in-window recall
    pub async fn fetch_recalls(&self) -> RecallResult<RecallBatch> {
        let mut batch = RecallBatch::new();
        let mut stats = IngestionStats::default();

        info!(
            "🚀 Ingesting recalls from pages {}..={}",
            self.settings.first_page(),
            self.settings.last_page()
        );

        for page in self.settings.page_range() {
            let verdict = self.read_page(page).await;

            let entries = match verdict {
                PageVerdict::Records(entries) => entries,
                PageVerdict::Unreachable(e) if page == self.settings.first_page() && e.is_transport() => {
                    error!("❌ First listing page failed: {}", e);
                    return Err(e);
                }
                other => {
                    info!("⏹️  Stopping at page {}: {}", page, other.describe());
                    break;
                }
            };

            stats.pages_read += 1;
            stats.entries_seen += entries.len();
            let kept = self.collect_page(entries, &mut batch, &mut stats).await;
            info!("📄 Page {}: {} recalls in window", page, kept);

            sleep(self.settings.page_delay()).await;
        }

        info!(
            "✅ Ingestion finished: {} pages, {} entries, {} kept, {} out of window, {} undated",
            stats.pages_read, stats.entries_seen, stats.kept, stats.out_of_window, stats.undated
        );
        Ok(batch)
    }

    async fn read_page(&self, page: u32) -> PageVerdict {
        let url = self.settings.listing_url(page);
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => return PageVerdict::Unreachable(e),
        };

        match self
            .parser
            .parse_page(&body, &ParseContext::new(page, self.settings.base_url()))
        {
            Ok(entries) if entries.is_empty() => PageVerdict::Empty,
            Ok(entries) => PageVerdict::Records(entries),
            Err(e) => PageVerdict::Unparseable(e),
        }
    }

    /// Filter and enrich one page of entries, returning how many were kept
    async fn collect_page(&self, entries: Vec<RawRecall>, batch: &mut RecallBatch, stats: &mut IngestionStats) -> usize {
        let mut kept = 0;
        for entry in entries {
            match self.settings.window().evaluate(&entry.raw_date) {
                DateVerdict::Keep(published_at) => {
                    let zone = self.enrich(&entry).await;
                    debug!("Kept '{}' ({})", entry.title, entry.raw_date);
                    batch.push(EnrichedRecall::new(entry, published_at, zone));
                    kept += 1;
                }
                DateVerdict::OutOfWindow(at) => {
                    debug!("Skipping '{}' published {}", entry.title, at);
                    stats.out_of_window += 1;
                }
                DateVerdict::Unparseable(e) => {
                    debug!("Dropping '{}': {}", entry.title, e);
                    stats.undated += 1;
                }
            }
        }
        stats.kept += kept;
        kept
    }

    async fn enrich(&self, entry: &RawRecall) -> String {
        if !self.settings.enrich_zones() {
            return String::new();
        }
        let zone = self.zones.resolve(&entry.link).await;
        sleep(self.settings.detail_delay()).await;
        zone
    }
}
