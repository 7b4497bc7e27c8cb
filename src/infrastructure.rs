//! Infrastructure layer for HTTP access, markup parsing and external integrations
//!
//! Concrete collaborators behind the domain traits: the listing/detail page
//! fetcher, the Mistral scoring oracle, the CSV sink and progress sinks, plus
//! configuration and logging setup.

pub mod config; // Configuration file, defaults and site constants
pub mod csv_export;
pub mod http_client;
pub mod logging;
pub mod mistral_client;
pub mod parsing; // Listing and detail page parsers
pub mod parsing_error;
pub mod progress;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, rappel_conso};
pub use csv_export::CsvFileSink;
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{bootstrap_dispatch, get_log_directory, init_logging_with_config};
pub use mistral_client::MistralClient;
pub use parsing::{
    DetailParseContext, ParseContext, ParsingConfig, ParsingError, ParsingResult, RecallDetailParser,
    RecallListParser,
};
pub use progress::{LogProgressSink, TerminalProgressSink};
