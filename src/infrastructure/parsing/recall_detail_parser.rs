//! Recall detail page parser
//!
//! Detail pages list their attributes as `label / value` span pairs; the only
//! attribute read here is the geographic sales zone.

use scraper::{Html, Selector};
use tracing::debug;

use super::config::RecallDetailSelectors;
use super::context::DetailParseContext;
use super::{ContextualParser, ParsingError, ParsingResult, compile_selectors, element_text};

pub struct RecallDetailParser {
    item_selectors: Vec<Selector>,
    label_selectors: Vec<Selector>,
    value_selectors: Vec<Selector>,
    zone_labels: Vec<String>,
}

impl RecallDetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&RecallDetailSelectors::default())
    }

    pub fn with_config(selectors: &RecallDetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            item_selectors: compile_selectors(&selectors.attribute_item)?,
            label_selectors: compile_selectors(&selectors.attribute_label)?,
            value_selectors: compile_selectors(&selectors.attribute_value)?,
            zone_labels: selectors.zone_labels.clone(),
        })
    }

    /// Parse a raw detail body into its sales zone
    pub fn parse_page(&self, body: &str, context: &DetailParseContext) -> ParsingResult<String> {
        let html = super::parse_document(body, Some(&context.url))?;
        self.parse_with_context(&html, context)
    }

    fn is_zone_label(&self, label: &str) -> bool {
        self.zone_labels.iter().any(|zone_label| label.contains(zone_label.as_str()))
    }
}

impl ContextualParser for RecallDetailParser {
    type Output = String;
    type Context = DetailParseContext;

    /// Value text of the first attribute whose label names the sales zone
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        for item_selector in &self.item_selectors {
            for item in html.select(item_selector) {
                let Some(label) = self.label_selectors.iter().find_map(|s| item.select(s).next()) else {
                    continue;
                };
                if !self.is_zone_label(&element_text(&label)) {
                    continue;
                }
                if let Some(value) = self.value_selectors.iter().find_map(|s| item.select(s).next()) {
                    let zone = element_text(&value);
                    debug!("Sales zone for {}: {}", context.url, zone);
                    return Ok(zone);
                }
            }
        }

        Err(ParsingError::required_field_missing(
            "zone",
            Some(context.url.as_str()),
        ))
    }
}
