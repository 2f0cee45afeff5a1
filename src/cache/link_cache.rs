//! Lazily populated cache of synaptic links
//!
//! Every query first makes sure the segments it needs have been fetched from
//! the backing store, then answers from the cached table.

use super::link_table::LinkTable;
use super::source::LinkSource;
use super::sqlite::SqliteLinkStore;
use crate::config::{CircuitConfig, FilterConfig};
use crate::graph::{DirectedWeightedGraph, LinkRecord, Point3, SegmentId};
use crate::{Result, SynfulError};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub link_count: usize,
    pub fetched_segment_count: usize,
    pub fetch_count: usize,
}

/// Synapse locations of one segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SynapseSites {
    /// Post-synaptic locations where the segment receives input
    pub input: Vec<Point3>,

    /// Pre-synaptic locations where the segment sends output
    pub output: Vec<Point3>,
}

/// Caching query layer over a link source
///
/// Rows are filtered once, when fetched, and never re-filtered. Cached rows and
/// fetched ids only grow for the lifetime of the cache.
pub struct LinkCache<S = SqliteLinkStore> {
    source: S,
    filters: FilterConfig,
    links: LinkTable,
    fetched: HashSet<SegmentId>,
    fetch_count: usize,
}

fn validate_filters(filters: &FilterConfig) -> Result<()> {
    if filters.score_threshold.is_nan() {
        return Err(SynfulError::Config(
            "score threshold must be a number, got NaN".to_string(),
        ));
    }
    Ok(())
}

impl LinkCache<SqliteLinkStore> {
    /// Open a cache over the SQLite link table at `path`
    pub fn open(path: impl AsRef<Path>, table: &str, filters: FilterConfig) -> Result<Self> {
        validate_filters(&filters)?;
        let store = SqliteLinkStore::open(path, table)?;
        Self::with_source(store, filters)
    }

    /// Open a cache using the store and filter settings of `config`
    pub fn from_config(config: &CircuitConfig) -> Result<Self> {
        Self::open(&config.store.path, &config.store.table, config.filters)
    }
}

impl<S: LinkSource> LinkCache<S> {
    /// Create an empty cache over an arbitrary link source
    ///
    /// Fails with a configuration error if the score threshold is NaN.
    pub fn with_source(source: S, filters: FilterConfig) -> Result<Self> {
        validate_filters(&filters)?;
        Ok(Self {
            source,
            filters,
            links: LinkTable::new(),
            fetched: HashSet::new(),
            fetch_count: 0,
        })
    }

    /// Make sure every id in `ids` has all its links cached
    ///
    /// Issues at most one fetch for the ids not yet cached. The cache is
    /// only touched after the fetch succeeds, so a failed call can be retried.
    fn ensure_fetched(&mut self, ids: &[SegmentId]) -> Result<()> {
        let missing = ids
            .iter()
            .copied()
            .filter(|id| !self.fetched.contains(id))
            .collect::<BTreeSet<_>>();

        if missing.is_empty() {
            tracing::trace!(ids = ids.len(), "Link cache hit");
            return Ok(());
        }

        let missing = missing.into_iter().collect::<Vec<_>>();
        tracing::debug!(
            source = %self.source.describe(),
            ids = missing.len(),
            "Fetching links for uncached segments"
        );

        self.fetch_count += 1;
        let fetched = self.source.fetch_links(&missing)?;
        let fetched_rows = fetched.len();

        // Autapse filter first, then score filter
        let filters = self.filters;
        let kept = fetched
            .into_iter()
            .filter(|link| !(filters.filter_autapses && link.is_autapse()))
            .filter(|link| filters.score_threshold <= 0.0 || link.score >= filters.score_threshold)
            .collect::<Vec<_>>();
        let kept_rows = kept.len();

        let added = self.links.append(kept);
        self.fetched.extend(missing);

        tracing::debug!(
            fetched = fetched_rows,
            kept = kept_rows,
            added,
            cached = self.links.len(),
            "Link fetch complete"
        );

        Ok(())
    }

    /// Up to `top_k` segments synapsing onto `id`, strongest first
    pub fn upstream_partners(
        &mut self,
        id: SegmentId,
        top_k: usize,
        weight_threshold: u32,
    ) -> Result<Vec<SegmentId>> {
        self.ensure_fetched(&[id])?;
        let graph = DirectedWeightedGraph::from_links(&self.links, weight_threshold);
        Ok(graph.top_predecessors(id, top_k))
    }

    /// Up to `top_k` segments `id` synapses onto, strongest first
    pub fn downstream_partners(
        &mut self,
        id: SegmentId,
        top_k: usize,
        weight_threshold: u32,
    ) -> Result<Vec<SegmentId>> {
        self.ensure_fetched(&[id])?;
        let graph = DirectedWeightedGraph::from_links(&self.links, weight_threshold);
        Ok(graph.top_successors(id, top_k))
    }

    /// Synaptic link records of `id`
    ///
    /// Without a partner, returns the records where `id` is post-synaptic
    /// (`input_site`) and/or pre-synaptic (`output_site`); at least one of the
    /// two must be set. With a partner, returns the links between `id` and
    /// `partner` in either direction and ignores the site flags. Rows come
    /// back in cache insertion order.
    pub fn synaptic_links(
        &mut self,
        id: SegmentId,
        partner: Option<SegmentId>,
        input_site: bool,
        output_site: bool,
    ) -> Result<Vec<LinkRecord>> {
        if partner.is_none() && !input_site && !output_site {
            return Err(SynfulError::InvalidArgument(
                "either input_site or output_site must be set".to_string(),
            ));
        }

        match partner {
            Some(partner) => {
                self.ensure_fetched(&[id, partner])?;
                Ok(self
                    .links
                    .iter()
                    .filter(|link| link.connects(id, partner))
                    .cloned()
                    .collect())
            }
            None => {
                self.ensure_fetched(&[id])?;
                Ok(self
                    .links
                    .iter()
                    .filter(|link| {
                        (output_site && link.segment_id_pre == id)
                            || (input_site && link.segment_id_post == id)
                    })
                    .cloned()
                    .collect())
            }
        }
    }

    /// Materialize the connectivity graph of the cached links
    ///
    /// With `ids`, those segments are fetched first and only records touching
    /// at least one of them are used. Without, the whole cache is used.
    pub fn links_to_graph(
        &mut self,
        ids: Option<&[SegmentId]>,
        weight_threshold: u32,
    ) -> Result<DirectedWeightedGraph> {
        match ids {
            Some(ids) => {
                self.ensure_fetched(ids)?;
                let wanted = ids.iter().copied().collect::<HashSet<_>>();
                let links = self.links.iter().filter(|link| {
                    wanted.contains(&link.segment_id_pre) || wanted.contains(&link.segment_id_post)
                });
                Ok(DirectedWeightedGraph::from_links(links, weight_threshold))
            }
            None => Ok(DirectedWeightedGraph::from_links(&self.links, weight_threshold)),
        }
    }

    /// Induced subgraph on `id` plus its top upstream and downstream partners
    pub fn subcircuit(
        &mut self,
        id: SegmentId,
        top_k: usize,
        weight_threshold: u32,
    ) -> Result<DirectedWeightedGraph> {
        self.ensure_fetched(&[id])?;
        let graph = DirectedWeightedGraph::from_links(&self.links, weight_threshold);

        let mut members = vec![id];
        members.extend(graph.top_predecessors(id, top_k));
        members.extend(graph.top_successors(id, top_k));

        Ok(graph.subgraph(&members))
    }

    /// Input and output synapse locations of `id`
    pub fn synapse_sites(&mut self, id: SegmentId) -> Result<SynapseSites> {
        self.ensure_fetched(&[id])?;

        let mut sites = SynapseSites::default();
        for link in &self.links {
            if link.segment_id_post == id {
                sites.input.push(link.post);
            }
            if link.segment_id_pre == id {
                sites.output.push(link.pre);
            }
        }
        Ok(sites)
    }

    /// All cached rows in insertion order
    pub fn links(&self) -> &[LinkRecord] {
        self.links.rows()
    }

    /// Whether all links of `id` are cached
    pub fn is_fetched(&self, id: SegmentId) -> bool {
        self.fetched.contains(&id)
    }

    /// Ids whose links are fully cached, ascending
    pub fn fetched_segments(&self) -> Vec<SegmentId> {
        let mut ids = self.fetched.iter().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            link_count: self.links.len(),
            fetched_segment_count: self.fetched.len(),
            fetch_count: self.fetch_count,
        }
    }
}
