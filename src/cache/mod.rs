//! Caching query layer for synaptic links
//!
//! `LinkCache` fetches link rows lazily per segment id from a `LinkSource`
//! (SQLite in production), filters and deduplicates them once, and derives
//! partner lists and connectivity graphs from the cached rows.

mod link_cache;
mod link_table;
mod source;
mod sqlite;

pub use link_cache::{CacheStats, LinkCache, SynapseSites};
pub use link_table::LinkTable;
pub use source::{LinkSource, MemoryLinkSource};
pub use sqlite::{SqliteLinkStore, DEFAULT_TABLE, LINK_COLUMNS, MAX_IDS_PER_QUERY};
