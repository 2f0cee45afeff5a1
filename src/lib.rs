//! SynfulCircuit - cached connectivity queries over synaptic link tables
//!
//! Exposes a table of detected synapses (stored in SQLite) as a directed
//! weighted graph of neural segments. Links are fetched lazily per segment id,
//! filtered and deduplicated once, and cached for the lifetime of a
//! `LinkCache`.
//!
//! # Architecture
//!
//! - **graph**: Core data structures (SegmentId, LinkRecord, DirectedWeightedGraph)
//! - **cache**: LinkCache, the LinkSource seam and the SQLite link store
//! - **config**: YAML configuration and validation
//! - **style**: Terminal colors for the `synful` CLI
//!
//! # Example
//!
//! ```no_run
//! use synfulcircuit::cache::LinkCache;
//! use synfulcircuit::config::FilterConfig;
//! use synfulcircuit::graph::SegmentId;
//!
//! # fn main() -> synfulcircuit::Result<()> {
//! let mut cache = LinkCache::open("links.db", "synlinks", FilterConfig::default())?;
//! let upstream = cache.upstream_partners(SegmentId::new(42), 5, 0)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;

pub mod logging;
pub mod style;

// Re-exports
pub use error::{Result, SynfulError};
