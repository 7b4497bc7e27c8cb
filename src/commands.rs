//! Command line front-end
//!
//! `weekly` refreshes the dashboard figures from the last seven days of
//! recalls, optionally with one region's model inputs; `historical` collects a dated window of recalls into a CSV file
//! for model training.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::application::{
    PipelineSettings, RecallIngestionPipeline, RegionOutlook, RiskReport, RiskScoringOrchestrator, RunMode,
};
use crate::domain::{DateWindow, PageFetcher, RecallBatch, RecallSink};
use crate::infrastructure::config::{AppConfig, ConfigManager, mistral};
use crate::infrastructure::logging::{bootstrap_dispatch, init_logging_with_config, log_system_info};
use crate::infrastructure::{CsvFileSink, HttpClient, LogProgressSink, MistralClient, TerminalProgressSink};

#[derive(Parser, Debug, Clone)]
#[command(name = "recall-watch", version, about = "Food recall ingestion and risk scoring for rappel.conso.gouv.fr")]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mistral API key used for scoring
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log progress instead of drawing a progress bar
    #[arg(long, global = true)]
    pub no_progress_bar: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score the recalls of the last days and print the safety index
    Weekly {
        /// Also write the ingested recalls to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Skip the detail page lookups
        #[arg(long)]
        no_zones: bool,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Collect recalls published in a date window into a CSV file
    Historical {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long, default_value = "2021-01-01")]
        from: NaiveDate,

        /// Last day of the window, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "2023-12-31")]
        to: NaiveDate,

        /// Last listing page to read
        #[arg(long)]
        max_page: Option<u32>,

        #[arg(long, default_value = "rappel_conso_2021_2023.csv")]
        output: PathBuf,
    },
}

/// Regional figures for the consultation forecasting model
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RegionArgs {
    /// Count this week's recalls sold in a region and print the model inputs
    #[arg(long)]
    pub region: Option<String>,

    /// Label-encoded region as the model was trained on
    #[arg(long, default_value_t = 0, requires = "region")]
    pub region_code: i64,

    /// Urban heat island intensity
    #[arg(long, default_value_t = 2.5, requires = "region")]
    pub uhii: f64,

    #[arg(long, default_value_t = 500.0, requires = "region")]
    pub co2: f64,
}

impl RegionArgs {
    pub fn outlook(&self, batch: &RecallBatch, year: i32) -> Option<RegionOutlook> {
        let region = self.region.as_deref()?;
        Some(RegionOutlook::from_batch(batch, region, self.region_code, year, self.uhii, self.co2))
    }
}

/// What a weekly run prints
#[derive(Debug, Clone)]
pub struct WeeklySummary {
    pub report: RiskReport,
    pub region: Option<RegionOutlook>,
}

/// Parse arguments, set up logging and run the chosen command to completion
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> Result<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config = {
        let _console = tracing::dispatcher::set_default(&bootstrap_dispatch()?);
        manager.load_config().await?
    };

    init_logging_with_config(&config.logging)?;
    log_system_info();

    let now = Local::now().naive_local();
    match cli.command {
        Command::Weekly { csv, no_zones, region } => {
            let api_key = cli
                .api_key
                .with_context(|| format!("{} is not set", mistral::API_KEY_ENV))?;
            let summary = run_weekly(
                &config,
                now,
                &api_key,
                csv.as_deref(),
                no_zones,
                &region,
                !cli.no_progress_bar,
            )
            .await?;
            print_report(&summary.report);
            if let Some(outlook) = &summary.region {
                print_outlook(outlook)?;
            }
        }
        Command::Historical {
            from,
            to,
            max_page,
            output,
        } => {
            let window = day_window(from, to)?;
            let written = run_historical(&config, now, window, max_page, &output).await?;
            println!("{written} recalls written to {}", output.display());
        }
    }

    Ok(())
}

/// `[from 00:00:00, to 23:59:59]`
pub fn day_window(from: NaiveDate, to: NaiveDate) -> Result<DateWindow> {
    let (Some(start), Some(end)) = (from.and_hms_opt(0, 0, 0), to.and_hms_opt(23, 59, 59)) else {
        bail!("Invalid window bounds {from} .. {to}");
    };
    Ok(DateWindow::new(start, end)?)
}

fn page_fetcher(config: &AppConfig) -> Result<Arc<dyn PageFetcher>> {
    let client = HttpClient::from_http_config(&config.http)?.with_context_label("rappel.conso");
    Ok(Arc::new(client))
}

async fn ingest(settings: PipelineSettings, fetcher: Arc<dyn PageFetcher>) -> Result<RecallBatch> {
    let pipeline = RecallIngestionPipeline::new(settings, fetcher)?;
    let batch = pipeline
        .fetch_recalls()
        .await
        .context("Failed to read the recall listing")?;
    Ok(batch)
}

pub async fn run_weekly(
    config: &AppConfig,
    now: NaiveDateTime,
    api_key: &str,
    csv: Option<&Path>,
    no_zones: bool,
    region: &RegionArgs,
    progress_bar: bool,
) -> Result<WeeklySummary> {
    let mut settings = config.to_pipeline_settings(now, &RunMode::Dashboard)?;
    if no_zones {
        settings = settings.with_enrich_zones(false);
    }

    let oracle = MistralClient::new(api_key, &config.scoring)?;
    let batch = ingest(settings, page_fetcher(config)?).await?;
    info!("{} recalls in the last {} days", batch.len(), config.pipeline.trailing_days);

    if let Some(path) = csv {
        write_csv(path, &batch)?;
    }
    let outlook = region.outlook(&batch, now.year());

    let orchestrator = RiskScoringOrchestrator::new(Arc::new(oracle));
    let scored = if progress_bar {
        let mut sink = TerminalProgressSink::new();
        let scored = orchestrator.score_batch(&batch, &mut sink).await;
        sink.finish();
        scored
    } else {
        let mut sink = LogProgressSink::new();
        orchestrator.score_batch(&batch, &mut sink).await
    };

    Ok(WeeklySummary {
        report: RiskReport::from_scored(scored),
        region: outlook,
    })
}

pub async fn run_historical(
    config: &AppConfig,
    now: NaiveDateTime,
    window: DateWindow,
    max_page: Option<u32>,
    output: &Path,
) -> Result<usize> {
    let settings = config.to_pipeline_settings(now, &RunMode::Historical { window, max_page })?;
    let batch = ingest(settings, page_fetcher(config)?).await?;
    write_csv(output, &batch)?;
    Ok(batch.len())
}

fn write_csv(path: &Path, batch: &RecallBatch) -> Result<()> {
    let mut sink = CsvFileSink::create(path)?;
    sink.write_rows(&batch.csv_rows())
}

fn print_report(report: &RiskReport) {
    println!("Safety index: {:.1} ({})", report.index, report.band.label());
    for recall in report.ranked() {
        println!("{:>3}  {}  {}", recall.score, recall.date, recall.title);
        if !recall.link.is_empty() {
            println!("     {}", recall.link);
        }
    }
}

fn print_outlook(outlook: &RegionOutlook) -> Result<()> {
    println!(
        "{}: {} recalls this week, countRiskWeighted {:.2}",
        outlook.region, outlook.occurrences, outlook.features.count_risk_weighted
    );
    println!("Model input: {}", serde_json::to_string(&outlook.features)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnrichedRecall, RawRecall};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn historical_defaults_cover_training_years() {
        let cli = Cli::try_parse_from(["recall-watch", "historical"]).unwrap();
        let Command::Historical { from, to, max_page, .. } = cli.command else {
            panic!("expected historical command");
        };
        let window = day_window(from, to).unwrap();
        assert_eq!(window, RunMode::historical_training_window().unwrap());
        assert_eq!(max_page, None);
    }

    #[test]
    fn weekly_accepts_csv_and_zone_flags() {
        let cli = Cli::try_parse_from(["recall-watch", "weekly", "--csv", "out.csv", "--no-zones"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Weekly { csv: Some(_), no_zones: true, .. }
        ));
    }

    #[test]
    fn weekly_region_options_build_the_outlook() {
        let cli = Cli::try_parse_from(["recall-watch", "weekly", "--region", "Bretagne", "--region-code", "3", "--co2", "410"])
            .unwrap();
        let Command::Weekly { region, .. } = cli.command else {
            panic!("expected weekly command");
        };
        let published_at = NaiveDate::from_ymd_opt(2025, 2, 14)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        let batch = RecallBatch::from(vec![
            EnrichedRecall::new(RawRecall::default(), published_at, "Bretagne".into()),
            EnrichedRecall::new(RawRecall::default(), published_at, "Normandie".into()),
        ]);

        let outlook = region.outlook(&batch, 2025).unwrap();

        assert_eq!(outlook.occurrences, 1);
        assert_eq!(outlook.features.as_vector(), [3.0, 2025.0, 52.14, 2.5, 410.0]);
    }

    #[test]
    fn weekly_without_region_has_no_outlook() {
        let cli = Cli::try_parse_from(["recall-watch", "weekly"]).unwrap();
        let Command::Weekly { region, .. } = cli.command else {
            panic!("expected weekly command");
        };
        assert_eq!(region.outlook(&RecallBatch::new(), 2025), None);
        assert!(Cli::try_parse_from(["recall-watch", "weekly", "--uhii", "3.0"]).is_err());
    }

    #[test]
    fn inverted_days_are_rejected() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(day_window(from, to).is_err());
    }
}
