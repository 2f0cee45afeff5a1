//! Deduplicated, append-only table of cached link rows

use crate::graph::{LinkKey, LinkRecord};
use std::collections::HashSet;

/// Ordered collection of distinct link records
///
/// Rows keep insertion order. A row identical on every field to one already
/// present is dropped on append, so the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    rows: Vec<LinkRecord>,
    keys: HashSet<LinkKey>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch, skipping exact duplicates. Returns the number of rows added.
    pub fn append(&mut self, batch: impl IntoIterator<Item = LinkRecord>) -> usize {
        let before = self.rows.len();
        for row in batch {
            if self.keys.insert(row.key()) {
                self.rows.push(row);
            }
        }
        self.rows.len() - before
    }

    pub fn rows(&self) -> &[LinkRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a LinkTable {
    type Item = &'a LinkRecord;
    type IntoIter = std::slice::Iter<'a, LinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
