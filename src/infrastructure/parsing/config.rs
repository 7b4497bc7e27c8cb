//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the rappel.conso.gouv.fr markup.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Listing page selectors
    pub list_selectors: RecallListSelectors,

    /// Detail page selectors
    pub detail_selectors: RecallDetailSelectors,
}

/// CSS selectors for listing pages, each with fallbacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallListSelectors {
    /// One node per recall entry
    pub product_item: Vec<String>,

    /// Anchor carrying title and detail href
    pub product_link: Vec<String>,

    pub maker: Vec<String>,

    /// Container of the risk/reason items
    pub description: Vec<String>,

    /// Items inside the description container, risk first, reason second
    pub description_item: Vec<String>,

    /// Node whose `datetime` attribute holds the publication date
    pub date: Vec<String>,

    /// Label prefixed to the risk text
    pub risks_label: String,

    /// Label prefixed to the reason text
    pub reason_label: String,
}

impl Default for RecallListSelectors {
    fn default() -> Self {
        Self {
            product_item: vec!["li.product-item".to_string()],
            product_link: vec!["a.product-link".to_string()],
            maker: vec!["p.product-maker".to_string()],
            description: vec!["div.product-desc".to_string()],
            description_item: vec!["div.product-desc-item".to_string()],
            date: vec![
                "p.product-date time[datetime]".to_string(),
                "time[datetime]".to_string(),
            ],
            risks_label: "Risques".to_string(),
            reason_label: "Motif".to_string(),
        }
    }
}

/// CSS selectors for recall detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallDetailSelectors {
    /// Structured attribute list items
    pub attribute_item: Vec<String>,

    /// Label span inside an attribute item
    pub attribute_label: Vec<String>,

    /// Value span inside an attribute item
    pub attribute_value: Vec<String>,

    /// Labels identifying the sales zone item, matched as substrings
    pub zone_labels: Vec<String>,
}

impl Default for RecallDetailSelectors {
    fn default() -> Self {
        Self {
            attribute_item: vec!["li.product-desc-item".to_string()],
            attribute_label: vec!["span.carac".to_string()],
            attribute_value: vec!["span.val".to_string()],
            zone_labels: vec![
                "Zone géographique de vente".to_string(),
                "Zone geographique de vente".to_string(),
            ],
        }
    }
}
