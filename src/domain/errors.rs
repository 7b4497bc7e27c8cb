//! Error taxonomy for a pipeline run
//!
//! Transport and parse failures on listing pages end pagination, the same
//! failures on detail pages are absorbed into an empty zone, date failures
//! drop the record and scoring failures default the score. Only a failed
//! first listing fetch and configuration errors reach the caller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecallError {
    #[error("HTTP error {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP request failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Markup parsing failed: {message}")]
    Parse { message: String, url: Option<String> },

    #[error("Unparseable recall date '{raw}': {reason}")]
    DateParse { raw: String, reason: String },

    #[error("Scoring failed: {message}")]
    Scoring { message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },
}

impl RecallError {
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn scoring(message: impl Into<String>) -> Self {
        Self::Scoring {
            message: message.into(),
        }
    }

    pub fn config(field: &str, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Non-success status or network failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Transport { .. })
    }
}

pub type RecallResult<T> = Result<T, RecallError>;
