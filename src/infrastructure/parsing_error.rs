//! Parsing error types for listing and detail markup
//!
//! Markup problems never abort a run: a listing page that fails to parse
//! ends pagination, a detail page that fails to parse yields an empty zone.

use thiserror::Error;

use crate::domain::errors::RecallError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("HTML parsing failed: {message}")]
    HtmlParsingFailed { message: String, url: Option<String> },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(|s| s.to_string()),
        }
    }

    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn html_parsing_failed(message: &str, url: Option<&str>) -> Self {
        Self::HtmlParsingFailed {
            message: message.to_string(),
            url: url.map(|s| s.to_string()),
        }
    }
}

impl From<ParsingError> for RecallError {
    fn from(err: ParsingError) -> Self {
        let url = match &err {
            ParsingError::HtmlParsingFailed { url, .. } => url.clone(),
            ParsingError::UrlResolutionFailed { url, .. } => Some(url.clone()),
            _ => None,
        };
        RecallError::Parse {
            message: err.to_string(),
            url,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
