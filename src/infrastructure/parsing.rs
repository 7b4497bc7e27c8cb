//! HTML parsing for rappel.conso.gouv.fr listing and detail pages
//!
//! Selectors are configured in [`config`] and compiled once per parser.

pub mod config;
pub mod context;
pub mod error;
pub mod recall_detail_parser;
pub mod recall_list_parser;

// Re-export public types
pub use config::{ParsingConfig, RecallDetailSelectors, RecallListSelectors};
pub use context::{DetailParseContext, ParseContext};
pub use error::{ParsingError, ParsingResult};
pub use recall_detail_parser::RecallDetailParser;
pub use recall_list_parser::RecallListParser;

use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Parser over an already-parsed document with contextual information
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Parse a response body, rejecting bodies that carry no markup at all.
///
/// The HTML5 parser recovers from any input, so this is the one place a
/// page can be declared unparseable.
pub fn parse_document(body: &str, url: Option<&str>) -> ParsingResult<Html> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ParsingError::html_parsing_failed("empty response body", url));
    }
    if !trimmed.contains('<') {
        return Err(ParsingError::html_parsing_failed("response body contains no markup", url));
    }
    Ok(Html::parse_document(body))
}

/// Compile fallback selector strings, keeping the ones that parse
pub(crate) fn compile_selectors(selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ParsingError::invalid_selector(
            &selector_strings.join(", "),
            &format!("no valid selectors compiled. Errors: {}", errors.join(", ")),
        ));
    }

    if !errors.is_empty() {
        debug!("Some selectors failed to compile: {}", errors.join(", "));
    }

    Ok(selectors)
}

/// Whitespace-normalised text content of an element
pub(crate) fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
