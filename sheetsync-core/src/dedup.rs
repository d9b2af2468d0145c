//! Tie-breaks for rows sharing a primary key.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::store::RemoteRow;

/// Picks which of several rows sharing a key survives deduplication.
pub trait DedupStrategy {
    /// Returns the index within `rows` of the row to keep.
    ///
    /// `rows` is in listing order and always holds at least two rows.
    fn keep(&self, key: &str, rows: &[RemoteRow]) -> usize;
}

/// Keeps the first row in listing order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSeen;

impl DedupStrategy for FirstSeen {
    fn keep(&self, _key: &str, _rows: &[RemoteRow]) -> usize {
        0
    }
}

/// Keeps the row with the most recent timestamp in `column`.
///
/// Rows whose value does not parse lose to any row that does; ties keep
/// the earliest row.
#[derive(Debug, Clone)]
pub struct LatestByColumn {
    column: String,
}

impl LatestByColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    fn timestamp(&self, row: &RemoteRow) -> Option<NaiveDateTime> {
        let text = row.custom.get(&self.column)?.as_deref()?.trim();
        parse_timestamp(text)
    }
}

impl DedupStrategy for LatestByColumn {
    fn keep(&self, _key: &str, rows: &[RemoteRow]) -> usize {
        let mut best = 0;
        let mut best_ts = rows.first().and_then(|r| self.timestamp(r));
        for (i, row) in rows.iter().enumerate().skip(1) {
            let ts = self.timestamp(row);
            if ts > best_ts {
                best = i;
                best_ts = ts;
            }
        }
        best
    }
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
