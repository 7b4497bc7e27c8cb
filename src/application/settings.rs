//! Validated, immutable run settings
//!
//! Built once from the loaded [`AppConfig`] and handed to the pipeline by
//! value. Nothing downstream reads configuration on its own.

use chrono::{NaiveDate, NaiveDateTime};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::domain::{DateWindow, RecallError, RecallResult};
use crate::infrastructure::config::{AppConfig, defaults, utils};

/// Which kind of run the pipeline performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Weekly dashboard refresh: first listing pages, trailing window
    Dashboard,
    /// Bulk scrape over an explicit window
    Historical {
        window: DateWindow,
        /// Overrides the configured last page
        max_page: Option<u32>,
    },
}

impl RunMode {
    /// Historical window used for the 2021-2023 training dataset
    pub fn historical_training_window() -> RecallResult<DateWindow> {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59));
        match (start, end) {
            (Some(start), Some(end)) => DateWindow::new(start, end),
            _ => Err(RecallError::config("window", "invalid training window bounds")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Historical { .. } => "historical",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    base_url: String,
    category_id: u32,
    last_page: u32,
    window: DateWindow,
    enrich_zones: bool,
    detail_delay: Duration,
    page_delay: Duration,
}

impl PipelineSettings {
    /// Settings with the default politeness delays and enrichment on
    pub fn new(base_url: &str, category_id: u32, last_page: u32, window: DateWindow) -> RecallResult<Self> {
        Url::parse(base_url).map_err(|e| RecallError::config("base_url", format!("'{base_url}': {e}")))?;
        if last_page < 1 {
            return Err(RecallError::config("max_page", "must be at least 1"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            category_id,
            last_page,
            window,
            enrich_zones: true,
            detail_delay: Duration::from_millis(defaults::DETAIL_DELAY_MS),
            page_delay: Duration::from_millis(defaults::PAGE_DELAY_MS),
        })
    }

    pub fn from_app_config(config: &AppConfig, mode: &RunMode, now: NaiveDateTime) -> RecallResult<Self> {
        let pipeline = &config.pipeline;
        let (last_page, window, enrich_zones) = match mode {
            RunMode::Dashboard => (
                pipeline.weekly_pages,
                DateWindow::trailing_days(now, pipeline.trailing_days)?,
                pipeline.enrich_zones,
            ),
            RunMode::Historical { window, max_page } => (max_page.unwrap_or(pipeline.max_page), *window, true),
        };

        let settings = Self::new(&pipeline.base_url, pipeline.category_id, last_page, window)?
            .with_enrich_zones(enrich_zones)
            .with_delays(
                Duration::from_millis(pipeline.detail_delay_ms),
                Duration::from_millis(pipeline.page_delay_ms),
            );
        settings.log_settings(mode);
        Ok(settings)
    }

    pub fn with_enrich_zones(mut self, enrich_zones: bool) -> Self {
        self.enrich_zones = enrich_zones;
        self
    }

    pub fn with_delays(mut self, detail_delay: Duration, page_delay: Duration) -> Self {
        self.detail_delay = detail_delay;
        self.page_delay = page_delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn first_page(&self) -> u32 {
        1
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn page_range(&self) -> RangeInclusive<u32> {
        self.first_page()..=self.last_page
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn enrich_zones(&self) -> bool {
        self.enrich_zones
    }

    pub fn detail_delay(&self) -> Duration {
        self.detail_delay
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    pub fn listing_url(&self, page: u32) -> String {
        utils::category_page_url(&self.base_url, self.category_id, page)
    }

    fn log_settings(&self, mode: &RunMode) {
        info!("🔧 Pipeline settings ({} run):", mode.name());
        info!(
            "   listing: category {} pages {}..={} ({})",
            self.category_id,
            self.first_page(),
            self.last_page,
            self.listing_url(1)
        );
        info!("   window: {} ..= {}", self.window.start(), self.window.end());
        info!(
            "   enrich_zones: {}, detail_delay: {:?}, page_delay: {:?}",
            self.enrich_zones, self.detail_delay, self.page_delay
        );
    }
}

impl AppConfig {
    pub fn to_pipeline_settings(&self, now: NaiveDateTime, mode: &RunMode) -> RecallResult<PipelineSettings> {
        PipelineSettings::from_app_config(self, mode, now)
    }
}
