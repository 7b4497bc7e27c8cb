use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Title used when a listing entry has no product anchor
pub const TITLE_PLACEHOLDER: &str = "No Title";

/// One listing-page entry before enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecall {
    pub title: String,
    /// Absolute URL of the detail page, or empty
    pub link: String,
    pub maker: String,
    #[serde(rename = "risksText")]
    pub risks_text: String,
    #[serde(rename = "reasonText")]
    pub reason_text: String,
    /// `DD/MM/YYYY HH:MM:SS` as published, empty when absent
    #[serde(rename = "rawDate")]
    pub raw_date: String,
}

impl Default for RawRecall {
    fn default() -> Self {
        Self {
            title: TITLE_PLACEHOLDER.to_string(),
            link: String::new(),
            maker: String::new(),
            risks_text: String::new(),
            reason_text: String::new(),
            raw_date: String::new(),
        }
    }
}

/// An in-window recall, optionally carrying the sales zone of its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecall {
    #[serde(flatten)]
    pub recall: RawRecall,
    #[serde(rename = "publishedAt")]
    pub published_at: NaiveDateTime,
    /// Empty when unresolved, not found, or enrichment was disabled
    pub zone: String,
}

impl EnrichedRecall {
    pub fn new(recall: RawRecall, published_at: NaiveDateTime, zone: String) -> Self {
        Self {
            recall,
            published_at,
            zone,
        }
    }

    /// Text handed to the scoring oracle
    pub fn summary(&self) -> String {
        format!(
            "{}. Risks: {}. Motif: {}",
            self.recall.title, self.recall.risks_text, self.recall.reason_text
        )
    }

    pub fn to_csv_row(&self) -> CsvRecallRow {
        CsvRecallRow {
            title: self.recall.title.clone(),
            maker: self.recall.maker.clone(),
            risks: self.recall.risks_text.clone(),
            reason: self.recall.reason_text.clone(),
            date: self.recall.raw_date.clone(),
            zone: self.zone.clone(),
            link: self.recall.link.clone(),
        }
    }
}

/// Projection of a recall with its oracle score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRecall {
    pub date: String,
    pub title: String,
    pub link: String,
    /// 0 (extremely dangerous) ..= 100 (safe or irrelevant)
    pub score: u8,
}

impl ScoredRecall {
    pub fn from_enriched(recall: &EnrichedRecall, score: u8) -> Self {
        Self {
            date: recall.recall.raw_date.clone(),
            title: recall.recall.title.clone(),
            link: recall.recall.link.clone(),
            score,
        }
    }
}

/// Flat row handed to the CSV collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRecallRow {
    pub title: String,
    pub maker: String,
    pub risks: String,
    pub reason: String,
    pub date: String,
    pub zone: String,
    pub link: String,
}

impl CsvRecallRow {
    pub const HEADER: [&'static str; 7] = ["title", "maker", "risks", "reason", "date", "zone", "link"];

    /// Field values in header order
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.title,
            &self.maker,
            &self.risks,
            &self.reason,
            &self.date,
            &self.zone,
            &self.link,
        ]
    }
}

/// Records of one pipeline run, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallBatch {
    records: Vec<EnrichedRecall>,
}

impl RecallBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, recall: EnrichedRecall) {
        self.records.push(recall);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRecall> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[EnrichedRecall] {
        &self.records
    }

    pub fn csv_rows(&self) -> Vec<CsvRecallRow> {
        self.records.iter().map(EnrichedRecall::to_csv_row).collect()
    }
}

impl From<Vec<EnrichedRecall>> for RecallBatch {
    fn from(records: Vec<EnrichedRecall>) -> Self {
        Self { records }
    }
}

impl IntoIterator for RecallBatch {
    type Item = EnrichedRecall;
    type IntoIter = std::vec::IntoIter<EnrichedRecall>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecallBatch {
    type Item = &'a EnrichedRecall;
    type IntoIter = std::slice::Iter<'a, EnrichedRecall>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
