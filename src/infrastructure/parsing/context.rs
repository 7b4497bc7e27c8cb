//! Parsing context for listing and detail pages

/// Context information for parsing one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Listing page number, starting at 1
    pub page_id: u32,

    /// Base URL for resolving relative links
    pub base_url: String,
}

impl ParseContext {
    pub fn new(page_id: u32, base_url: impl Into<String>) -> Self {
        Self {
            page_id,
            base_url: base_url.into(),
        }
    }
}

/// Detail parsing context for recall detail pages
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Detail URL being parsed
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
