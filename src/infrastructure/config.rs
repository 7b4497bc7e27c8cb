//! Configuration infrastructure
//!
//! Settings are loaded once from a JSON file in the user config directory
//! and turned into immutable pipeline settings by the application layer.
//! Nothing here is read at import time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub http: HttpConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Listing, window and politeness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Site root used for listing URLs and relative links
    pub base_url: String,

    /// Listing category (94 = viandes)
    pub category_id: u32,

    /// Last listing page of a historical run
    pub max_page: u32,

    /// Pages scanned by the weekly run
    pub weekly_pages: u32,

    /// Length of the weekly trailing window in days
    pub trailing_days: u32,

    /// Resolve the sales zone of each kept recall
    pub enrich_zones: bool,

    /// Pause after each detail page fetch
    pub detail_delay_ms: u64,

    /// Pause after each listing page
    pub page_delay_ms: u64,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_seconds: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
}

/// Scoring oracle settings. The API key is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub api_base: String,
    pub model: String,
    pub request_timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Name of the log file inside the log directory
    pub file_name: String,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: rappel_conso::BASE_URL.to_string(),
            category_id: rappel_conso::MEAT_CATEGORY_ID,
            max_page: defaults::HISTORICAL_MAX_PAGE,
            weekly_pages: defaults::WEEKLY_PAGES,
            trailing_days: defaults::TRAILING_DAYS,
            enrich_zones: defaults::ENRICH_ZONES,
            detail_delay_ms: defaults::DETAIL_DELAY_MS,
            page_delay_ms: defaults::PAGE_DELAY_MS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            api_base: mistral::API_BASE.to_string(),
            model: mistral::DEFAULT_MODEL.to_string(),
            request_timeout_seconds: defaults::SCORING_TIMEOUT_SECONDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "warn".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "error".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters.insert("recall_watch_lib".to_string(), defaults::LOG_LEVEL.to_string());
                filters
            },
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("recall-watch");

        Ok(config_dir)
    }

    /// Manager for the default config file location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("recall_watch_config.json");
        Ok(Self { config_path })
    }

    /// Manager for an explicit config file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file is corrupted: {}", parse_error);

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;

                info!("✅ Reset to default configuration");
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// rappel.conso.gouv.fr site constants
pub mod rappel_conso {
    /// Site root
    pub const BASE_URL: &str = "https://rappel.conso.gouv.fr";

    /// "Viandes" category
    pub const MEAT_CATEGORY_ID: u32 = 94;
}

/// Mistral chat completion endpoint constants
pub mod mistral {
    pub const API_BASE: &str = "https://api.mistral.ai";

    pub const DEFAULT_MODEL: &str = "mistral-large-latest";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";
}

/// Default configuration values
pub mod defaults {
    /// Last page of the meat category listing at the time of the bulk scrape
    pub const HISTORICAL_MAX_PAGE: u32 = 209;

    /// The weekly run only reads the first listing page
    pub const WEEKLY_PAGES: u32 = 1;

    pub const TRAILING_DAYS: u32 = 7;

    pub const ENRICH_ZONES: bool = true;

    /// Minimum pause after each detail page request
    pub const DETAIL_DELAY_MS: u64 = 500;

    /// Minimum pause after each listing page
    pub const PAGE_DELAY_MS: u64 = 1000;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const SCORING_TIMEOUT_SECONDS: u64 = 60;

    pub const USER_AGENT: &str = "recall-watch/0.2 (food recall monitoring)";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = true;

    pub const LOG_FILE_NAME: &str = "recall-watch.log";

    pub const LOG_MAX_FILES: u32 = 5;

    pub const LOG_AUTO_CLEANUP: bool = true;
}

/// URL building helper functions
pub mod utils {
    /// Listing URL for one page of a category, e.g. `{base}/categorie/94/3`
    pub fn category_page_url(base_url: &str, category_id: u32, page: u32) -> String {
        format!("{}/categorie/{}/{}", base_url.trim_end_matches('/'), category_id, page)
    }
}
