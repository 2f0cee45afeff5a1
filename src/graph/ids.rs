//! Type-safe segment identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a reconstructed neural segment
///
/// Stored as a SQLite INTEGER. Id 0 is the background label and never
/// names a real segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(i64);

impl SegmentId {
    /// The background label
    pub const BACKGROUND: SegmentId = SegmentId(0);

    /// Create a new SegmentId
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying integer
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the background label (id 0)
    pub const fn is_background(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SegmentId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl FromStr for SegmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl rusqlite::ToSql for SegmentId {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.0))
    }
}

impl rusqlite::types::FromSql for SegmentId {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        <i64 as rusqlite::types::FromSql>::column_result(value).map(Self)
    }
}
