//! Publication date parsing and the inclusive in-window policy

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::errors::{RecallError, RecallResult};

/// Format of the `datetime` attribute on listing pages, e.g. `14/02/2025 15:43:31`
pub const RECALL_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub fn parse_recall_date(raw: &str) -> RecallResult<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecallError::DateParse {
            raw: raw.to_string(),
            reason: "missing date".to_string(),
        });
    }
    NaiveDateTime::parse_from_str(trimmed, RECALL_DATE_FORMAT).map_err(|e| RecallError::DateParse {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Outcome of checking one raw date against a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateVerdict {
    Keep(NaiveDateTime),
    OutOfWindow(NaiveDateTime),
    Unparseable(RecallError),
}

/// Inclusive `[start, end]` publication window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> RecallResult<Self> {
        if start > end {
            return Err(RecallError::config(
                "window",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// `[now - days, now]`
    pub fn trailing_days(now: NaiveDateTime, days: u32) -> RecallResult<Self> {
        let start = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| RecallError::config("trailing_days", format!("{days} days before {now} is out of range")))?;
        Self::new(start, now)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn evaluate(&self, raw_date: &str) -> DateVerdict {
        match parse_recall_date(raw_date) {
            Ok(at) if self.contains(at) => DateVerdict::Keep(at),
            Ok(at) => DateVerdict::OutOfWindow(at),
            Err(e) => DateVerdict::Unparseable(e),
        }
    }

    /// Parsed timestamp when the record is kept. Missing or unparseable
    /// dates are never in the window.
    pub fn keep(&self, raw_date: &str) -> Option<NaiveDateTime> {
        match self.evaluate(raw_date) {
            DateVerdict::Keep(at) => Some(at),
            DateVerdict::OutOfWindow(_) | DateVerdict::Unparseable(_) => None,
        }
    }
}
