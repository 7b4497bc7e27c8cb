//! Recall listing parser
//!
//! Turns one category listing page into [`RawRecall`] entries. Entries are
//! never dropped here: a missing node becomes a default field value.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::config::RecallListSelectors;
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult, compile_selectors, element_text};
use crate::domain::recall::{RawRecall, TITLE_PLACEHOLDER};

/// Parser for extracting recall entries from listing pages
pub struct RecallListParser {
    item_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    maker_selectors: Vec<Selector>,
    description_selectors: Vec<Selector>,
    description_item_selectors: Vec<Selector>,
    date_selectors: Vec<Selector>,
    risks_label: String,
    reason_label: String,
}

impl RecallListParser {
    /// Create a new parser with the site's default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&RecallListSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &RecallListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            item_selectors: compile_selectors(&selectors.product_item)?,
            link_selectors: compile_selectors(&selectors.product_link)?,
            maker_selectors: compile_selectors(&selectors.maker)?,
            description_selectors: compile_selectors(&selectors.description)?,
            description_item_selectors: compile_selectors(&selectors.description_item)?,
            date_selectors: compile_selectors(&selectors.date)?,
            risks_label: selectors.risks_label.clone(),
            reason_label: selectors.reason_label.clone(),
        })
    }

    /// Parse a raw listing body
    pub fn parse_page(&self, body: &str, context: &ParseContext) -> ParsingResult<Vec<RawRecall>> {
        let html = super::parse_document(body, None)?;
        self.parse_with_context(&html, context)
    }
}

impl ContextualParser for RecallListParser {
    type Output = Vec<RawRecall>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing recall listing for page {}", context.page_id);

        // First selector that matches anything wins
        let items: Vec<ElementRef> = self
            .item_selectors
            .iter()
            .map(|selector| html.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        let recalls: Vec<RawRecall> = items
            .iter()
            .map(|item| self.extract_recall_from_element(item, &context.base_url))
            .collect();

        debug!("Extracted {} recall entries from page {}", recalls.len(), context.page_id);
        Ok(recalls)
    }
}

impl RecallListParser {
    fn extract_recall_from_element(&self, element: &ElementRef, base_url: &str) -> RawRecall {
        let anchor = first_match(element, &self.link_selectors);

        let title = anchor
            .as_ref()
            .map_or_else(|| TITLE_PLACEHOLDER.to_string(), element_text);

        let link = anchor
            .as_ref()
            .and_then(|a| a.value().attr("href"))
            .map(|href| self.resolve_url(href, base_url).unwrap_or_else(|e| {
                warn!("Dropping unresolvable recall link: {}", e);
                String::new()
            }))
            .unwrap_or_default();

        let maker = first_match(element, &self.maker_selectors)
            .map(|node| element_text(&node))
            .unwrap_or_default();

        let (risks_text, reason_text) = self.extract_description(element);

        let raw_date = first_match(element, &self.date_selectors)
            .and_then(|node| node.value().attr("datetime"))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();

        RawRecall {
            title,
            link,
            maker,
            risks_text,
            reason_text,
            raw_date,
        }
    }

    /// First two description items as (risks, reason)
    fn extract_description(&self, element: &ElementRef) -> (String, String) {
        let Some(container) = first_match(element, &self.description_selectors) else {
            return (String::new(), String::new());
        };

        let items: Vec<String> = self
            .description_item_selectors
            .iter()
            .map(|selector| container.select(selector).map(|e| element_text(&e)).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        let risks = items
            .first()
            .map(|text| strip_label(text, &self.risks_label))
            .unwrap_or_default();
        let reason = items
            .get(1)
            .map(|text| strip_label(text, &self.reason_label))
            .unwrap_or_default();

        (risks, reason)
    }

    /// Resolve a listing href against the site base URL
    fn resolve_url(&self, href: &str, base_url: &str) -> ParsingResult<String> {
        let href = href.trim();
        if href.is_empty() {
            return Ok(String::new());
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            return Ok(href.to_string());
        }

        let base = Url::parse(base_url).map_err(|e| ParsingError::UrlResolutionFailed {
            url: base_url.to_string(),
            reason: format!("Invalid base URL: {e}"),
            base_url: None,
        })?;

        base.join(href)
            .map(|url| url.to_string())
            .map_err(|e| ParsingError::UrlResolutionFailed {
                url: href.to_string(),
                reason: format!("Failed to join URL: {e}"),
                base_url: Some(base_url.to_string()),
            })
    }
}

fn first_match<'a>(element: &ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|selector| element.select(selector).next())
}

/// Drop a leading `"<label> :"` from a description item
fn strip_label(text: &str, label: &str) -> String {
    match text.strip_prefix(label) {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.strip_prefix(':').unwrap_or(rest).trim().to_string()
        }
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://rappel.conso.gouv.fr";

    fn page(items: &str) -> String {
        format!(r#"<html><body><ul class="product-list">{items}</ul></body></html>"#)
    }

    const FULL_ITEM: &str = r#"
        <li class="product-item">
          <a class="product-link" href="/fiche-rappel/17342/Interne"> Rillettes de porc </a>
          <p class="my-0 product-maker">Charcuterie Martin</p>
          <div class="product-desc">
            <div class="product-desc-item">Risques : Listeria monocytogenes (agent responsable de la listériose)</div>
            <div class="product-desc-item">Motif : Présence de Listeria monocytogenes</div>
          </div>
          <p class="text-muted product-date">Publié le <time datetime="14/02/2025 15:43:31">14/02/2025</time></p>
        </li>"#;

    #[test]
    fn test_parser_creation() {
        assert!(RecallListParser::new().is_ok());
    }

    #[test]
    fn extracts_every_field_of_a_complete_entry() {
        let parser = RecallListParser::new().unwrap();
        let recalls = parser.parse_page(&page(FULL_ITEM), &ParseContext::new(1, BASE)).unwrap();

        assert_eq!(recalls.len(), 1);
        let recall = &recalls[0];
        assert_eq!(recall.title, "Rillettes de porc");
        assert_eq!(recall.link, "https://rappel.conso.gouv.fr/fiche-rappel/17342/Interne");
        assert_eq!(recall.maker, "Charcuterie Martin");
        assert_eq!(recall.risks_text, "Listeria monocytogenes (agent responsable de la listériose)");
        assert_eq!(recall.reason_text, "Présence de Listeria monocytogenes");
        assert_eq!(recall.raw_date, "14/02/2025 15:43:31");
    }

    #[test]
    fn missing_nodes_become_defaults_without_dropping_the_entry() {
        let bare = r#"<li class="product-item"><span>rien</span></li>"#;
        let parser = RecallListParser::new().unwrap();
        let recalls = parser
            .parse_page(&page(&format!("{FULL_ITEM}{bare}")), &ParseContext::new(1, BASE))
            .unwrap();

        assert_eq!(recalls.len(), 2);
        assert_eq!(recalls[1], RawRecall::default());
        assert_eq!(recalls[1].title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn single_description_item_leaves_reason_empty() {
        let item = r#"
            <li class="product-item">
              <a class="product-link" href="https://rappel.conso.gouv.fr/fiche-rappel/1/Interne">Steak haché</a>
              <div class="product-desc"><div class="product-desc-item">Risques : E. coli</div></div>
            </li>"#;
        let parser = RecallListParser::new().unwrap();
        let recalls = parser.parse_page(&page(item), &ParseContext::new(2, BASE)).unwrap();

        assert_eq!(recalls[0].risks_text, "E. coli");
        assert_eq!(recalls[0].reason_text, "");
        assert_eq!(recalls[0].maker, "");
        assert_eq!(recalls[0].raw_date, "");
    }

    #[test]
    fn anchor_without_href_yields_empty_link() {
        let item = r#"<li class="product-item"><a class="product-link">Jambon</a></li>"#;
        let parser = RecallListParser::new().unwrap();
        let recalls = parser.parse_page(&page(item), &ParseContext::new(1, BASE)).unwrap();

        assert_eq!(recalls[0].title, "Jambon");
        assert_eq!(recalls[0].link, "");
    }

    #[test]
    fn page_without_entries_parses_to_nothing() {
        let parser = RecallListParser::new().unwrap();
        let recalls = parser
            .parse_page("<html><body><p>Aucun rappel</p></body></html>", &ParseContext::new(9, BASE))
            .unwrap();
        assert!(recalls.is_empty());
    }

    #[test]
    fn non_markup_body_is_a_parse_error() {
        let parser = RecallListParser::new().unwrap();
        assert!(matches!(
            parser.parse_page("", &ParseContext::new(1, BASE)),
            Err(ParsingError::HtmlParsingFailed { .. })
        ));
    }

    #[test]
    fn test_url_resolution() {
        let parser = RecallListParser::new().unwrap();

        assert_eq!(
            parser.resolve_url("/fiche-rappel/123/Interne", BASE).unwrap(),
            "https://rappel.conso.gouv.fr/fiche-rappel/123/Interne"
        );
        assert_eq!(
            parser.resolve_url("https://other.example/test", BASE).unwrap(),
            "https://other.example/test"
        );
        assert_eq!(
            parser.resolve_url("fiche-rappel/7", BASE).unwrap(),
            "https://rappel.conso.gouv.fr/fiche-rappel/7"
        );
        assert_eq!(parser.resolve_url("", BASE).unwrap(), "");
        assert!(parser.resolve_url("/x", "not a url").is_err());
    }

    #[test]
    fn labels_are_stripped_only_when_leading() {
        assert_eq!(strip_label("Risques : Salmonelle", "Risques"), "Salmonelle");
        assert_eq!(strip_label("Risques: Salmonelle", "Risques"), "Salmonelle");
        assert_eq!(strip_label("Salmonelle (Risques)", "Risques"), "Salmonelle (Risques)");
    }
}
