//! Append-only log of error records with newest-first retrieval.

use crate::error::ErrorRecord;

/// Ordered log of every error raised during the session.
///
/// Records are only ever appended. Retrieval through [`ErrorLog::traceback`] is
/// 1-based and counts from the most recent record, so index 1 is always the
/// newest error.
#[derive(Debug, Default, Clone)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` and returns its position from the start of the log.
    pub fn push(&mut self, record: ErrorRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Returns the record `index` steps back from the newest one.
    ///
    /// `None` when the log is empty or `index` falls outside `1..=count()`.
    pub fn traceback(&self, index: i64) -> Option<&ErrorRecord> {
        let back = usize::try_from(index).ok().filter(|&i| i >= 1)?;
        let position = self.records.len().checked_sub(back)?;
        self.records.get(position)
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }

    /// Drops every record. Only used on shutdown.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
