//! Backing-store abstraction for link rows

use crate::graph::{LinkRecord, SegmentId};
use crate::Result;

/// A read-only source of synaptic link rows
///
/// `fetch_links` returns every stored record whose pre or post segment is one
/// of `ids`, unfiltered. Implementations must not leave partial results
/// behind on error: either the whole batch is returned or an error is.
pub trait LinkSource {
    /// Fetch all records involving any of `ids`
    fn fetch_links(&mut self, ids: &[SegmentId]) -> Result<Vec<LinkRecord>>;

    /// Short human-readable description for logs
    fn describe(&self) -> String {
        "link source".to_string()
    }
}

impl<S: LinkSource + ?Sized> LinkSource for Box<S> {
    fn fetch_links(&mut self, ids: &[SegmentId]) -> Result<Vec<LinkRecord>> {
        (**self).fetch_links(ids)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-memory link source
///
/// Holds a fixed set of rows and counts how many fetches were issued against
/// it. Useful for analysis on pre-loaded data and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkSource {
    rows: Vec<LinkRecord>,
    fetch_count: usize,
}

impl MemoryLinkSource {
    pub fn new(rows: Vec<LinkRecord>) -> Self {
        Self {
            rows,
            fetch_count: 0,
        }
    }

    /// Number of `fetch_links` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// Add a row, as if it had been written to the backing table
    pub fn push(&mut self, row: LinkRecord) {
        self.rows.push(row);
    }
}

impl LinkSource for MemoryLinkSource {
    fn fetch_links(&mut self, ids: &[SegmentId]) -> Result<Vec<LinkRecord>> {
        self.fetch_count += 1;
        Ok(self
            .rows
            .iter()
            .filter(|row| ids.iter().any(|id| row.involves(*id)))
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} rows)", self.rows.len())
    }
}
