//! SQLite link store

use super::source::LinkSource;
use crate::config::is_sql_identifier;
use crate::graph::{LinkRecord, Point3, SegmentId};
use crate::{Result, SynfulError};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

/// Columns read from the link table, in row order
pub const LINK_COLUMNS: [&str; 10] = [
    "pre_x",
    "pre_y",
    "pre_z",
    "post_x",
    "post_y",
    "post_z",
    "scores",
    "segmentid_pre",
    "segmentid_post",
    "cleft_scores",
];

/// Default name of the link table
pub const DEFAULT_TABLE: &str = "synlinks";

/// Upper bound on ids bound into a single statement
///
/// Stays well below SQLite's host parameter limit.
pub const MAX_IDS_PER_QUERY: usize = 10_000;

/// Read-only access to a synaptic link table in SQLite
pub struct SqliteLinkStore {
    conn: Connection,
    table: String,
    path: PathBuf,
}

impl SqliteLinkStore {
    /// Open an existing link database read-only
    ///
    /// Fails with a connection error if the file cannot be opened, and with
    /// a configuration error if `table` is not a plain SQL identifier.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        validate_table(table)?;

        tracing::info!(path = %path.display(), table, "Opening link store");

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SynfulError::Connection {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            conn,
            table: table.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Wrap an already-open connection
    pub fn from_connection(conn: Connection, table: &str) -> Result<Self> {
        validate_table(table)?;
        let path = conn.path().map(PathBuf::from).unwrap_or_default();

        Ok(Self {
            conn,
            table: table.to_string(),
            path,
        })
    }

    /// Name of the link table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Path of the database file (empty for in-memory databases)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query one batch of ids with bound parameters
    fn query_batch(&self, ids: &[SegmentId]) -> Result<Vec<LinkRecord>> {
        // Each id is bound once as ?N and referenced from both IN lists
        let placeholders = (1..=ids.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE segmentid_pre IN ({}) OR segmentid_post IN ({})",
            LINK_COLUMNS.join(","),
            self.table,
            placeholders,
            placeholders
        );

        tracing::debug!(table = %self.table, ids = ids.len(), "Issuing link query");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), row_to_link)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}

impl LinkSource for SqliteLinkStore {
    fn fetch_links(&mut self, ids: &[SegmentId]) -> Result<Vec<LinkRecord>> {
        let mut links = Vec::new();
        for batch in ids.chunks(MAX_IDS_PER_QUERY) {
            links.extend(self.query_batch(batch)?);
        }
        Ok(links)
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.path.display(), self.table)
    }
}

fn validate_table(table: &str) -> Result<()> {
    if is_sql_identifier(table) {
        Ok(())
    } else {
        Err(SynfulError::Config(format!(
            "Invalid table name '{}': expected a plain SQL identifier",
            table
        )))
    }
}

fn row_to_link(row: &Row<'_>) -> rusqlite::Result<LinkRecord> {
    Ok(LinkRecord {
        pre: Point3::new(real(row, 0)?, real(row, 1)?, real(row, 2)?),
        post: Point3::new(real(row, 3)?, real(row, 4)?, real(row, 5)?),
        score: real(row, 6)?,
        segment_id_pre: row.get(7)?,
        segment_id_post: row.get(8)?,
        cleft_score: real(row, 9)?,
    })
}

/// Read a REAL column, mapping NULL to NaN
fn real(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LinkCache;
    use crate::config::FilterConfig;

    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE synlinks (
                pre_x REAL, pre_y REAL, pre_z REAL,
                post_x REAL, post_y REAL, post_z REAL,
                scores REAL,
                segmentid_pre INTEGER, segmentid_post INTEGER,
                cleft_scores REAL
            );
            INSERT INTO synlinks VALUES (1, 2, 3, 4, 5, 6, 80, 5, 9, 10);
            INSERT INTO synlinks VALUES (1, 2, 3, 4, 5, 6, 70, 9, 5, 11);
            INSERT INTO synlinks VALUES (7, 8, 9, 1, 2, 3, 90, 3, 4, 12);
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fetch_by_pre_or_post() {
        let mut store = SqliteLinkStore::from_connection(seeded_connection(), "synlinks").unwrap();

        let links = store.fetch_links(&[SegmentId::new(5)]).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].segment_id_pre, SegmentId::new(5));
        assert_eq!(links[0].pre, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(links[0].cleft_score, 10.0);

        let links = store
            .fetch_links(&[SegmentId::new(4), SegmentId::new(42)])
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].score, 90.0);
    }

    #[test]
    fn test_rejects_unsafe_table_name() {
        let result = SqliteLinkStore::from_connection(seeded_connection(), "synlinks; DROP TABLE x");
        assert!(matches!(result, Err(SynfulError::Config(_))));
    }

    #[test]
    fn test_missing_table_is_store_error() {
        let mut store = SqliteLinkStore::from_connection(seeded_connection(), "other").unwrap();
        let result = store.fetch_links(&[SegmentId::new(5)]);
        assert!(matches!(result, Err(SynfulError::Store(_))));
    }

    fn ids_spanning_two_batches() -> Vec<SegmentId> {
        (1..=MAX_IDS_PER_QUERY as i64 + 1).map(SegmentId::new).collect()
    }

    #[test]
    fn test_fetch_splits_large_id_lists() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE synlinks (
                pre_x REAL, pre_y REAL, pre_z REAL,
                post_x REAL, post_y REAL, post_z REAL,
                scores REAL,
                segmentid_pre INTEGER, segmentid_post INTEGER,
                cleft_scores REAL
            );
            INSERT INTO synlinks VALUES (1, 2, 3, 4, 5, 6, 80, 1, {}, 10);
            "#,
            MAX_IDS_PER_QUERY + 1
        ))
        .unwrap();
        let ids = ids_spanning_two_batches();

        // Pre falls in the first batch and post in the second
        let mut store = SqliteLinkStore::from_connection(conn, "synlinks").unwrap();
        assert_eq!(store.fetch_links(&ids).unwrap().len(), 2);

        let mut cache = LinkCache::with_source(store, FilterConfig::default()).unwrap();
        let graph = cache.links_to_graph(Some(&ids), 0).unwrap();
        assert_eq!(cache.links().len(), 1);
        assert_eq!(graph.edge_weight(SegmentId::new(1), SegmentId::new(10_001)), Some(1));
        assert!(cache.is_fetched(SegmentId::new(10_001)));
    }

    #[test]
    fn test_failed_later_batch_leaves_cache_untouched() {
        let conn = seeded_connection();
        conn.execute(
            "INSERT INTO synlinks VALUES (1, 2, 3, 4, 5, 6, 'bad', ?1, 2, 10)",
            [MAX_IDS_PER_QUERY as i64 + 1],
        )
        .unwrap();
        conn.execute("INSERT INTO synlinks VALUES (1, 2, 3, 4, 5, 6, 90, 1, 2, 10)", [])
            .unwrap();
        let ids = ids_spanning_two_batches();

        let store = SqliteLinkStore::from_connection(conn, "synlinks").unwrap();
        let mut cache = LinkCache::with_source(store, FilterConfig::default()).unwrap();
        let result = cache.links_to_graph(Some(&ids), 0);

        assert!(matches!(result, Err(SynfulError::Store(_))));
        assert!(cache.links().is_empty());
        assert!(!cache.is_fetched(SegmentId::new(1)));
        assert_eq!(cache.stats().fetched_segment_count, 0);
        assert_eq!(cache.stats().fetch_count, 1);
    }

    #[test]
    fn test_open_missing_file_is_connection_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SqliteLinkStore::open(dir.path().join("absent.db"), DEFAULT_TABLE);
        assert!(matches!(result, Err(SynfulError::Connection { .. })));
    }
}
