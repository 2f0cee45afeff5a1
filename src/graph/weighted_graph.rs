//! Directed weighted connectivity graph
//!
//! Built from link records by counting duplicate (pre, post) pairs. The graph
//! is a snapshot: it is rebuilt from the link table on every request and never
//! updated in place.

use super::ids::SegmentId;
use super::link::LinkRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A directed edge with its synapse count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: SegmentId,
    pub target: SegmentId,
    pub weight: u32,
}

/// Directed graph of segments weighted by synapse count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectedWeightedGraph {
    nodes: BTreeSet<SegmentId>,

    /// Edges in first-seen order of their (pre, post) pair
    edges: Vec<Edge>,

    /// node -> [(successor, weight)], heaviest first
    #[serde(skip)]
    successors: HashMap<SegmentId, Vec<(SegmentId, u32)>>,

    /// node -> [(predecessor, weight)], heaviest first
    #[serde(skip)]
    predecessors: HashMap<SegmentId, Vec<(SegmentId, u32)>>,
}

/// Graph statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
}

impl DirectedWeightedGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a graph from link records
    ///
    /// Records touching the background label are skipped. Each remaining
    /// (pre, post) pair becomes one edge weighted by how often it occurs;
    /// pairs occurring fewer than `weight_threshold` times are dropped.
    pub fn from_links<'a, I>(links: I, weight_threshold: u32) -> Self
    where
        I: IntoIterator<Item = &'a LinkRecord>,
    {
        let mut index: HashMap<(SegmentId, SegmentId), usize> = HashMap::new();
        let mut counted: Vec<((SegmentId, SegmentId), u32)> = Vec::new();

        for link in links {
            if link.touches_background() {
                continue;
            }
            let slot = *index.entry(link.pair()).or_insert_with(|| {
                counted.push((link.pair(), 0));
                counted.len() - 1
            });
            counted[slot].1 += 1;
        }

        let edges = counted
            .into_iter()
            .filter(|(_, weight)| *weight >= weight_threshold)
            .map(|((source, target), weight)| Edge {
                source,
                target,
                weight,
            })
            .collect::<Vec<_>>();

        let nodes = edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .collect::<BTreeSet<_>>();

        Self::from_parts(nodes, edges)
    }

    fn from_parts(nodes: BTreeSet<SegmentId>, edges: Vec<Edge>) -> Self {
        let mut successors: HashMap<SegmentId, Vec<(SegmentId, u32)>> = HashMap::new();
        let mut predecessors: HashMap<SegmentId, Vec<(SegmentId, u32)>> = HashMap::new();

        for edge in &edges {
            successors
                .entry(edge.source)
                .or_default()
                .push((edge.target, edge.weight));
            predecessors
                .entry(edge.target)
                .or_default()
                .push((edge.source, edge.weight));
        }

        // Stable sort: equal weights keep first-seen order
        for neighbors in successors.values_mut().chain(predecessors.values_mut()) {
            neighbors.sort_by(|a, b| b.1.cmp(&a.1));
        }

        Self {
            nodes,
            edges,
            successors,
            predecessors,
        }
    }

    /// All nodes in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.nodes.iter().copied()
    }

    /// All edges in first-seen order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains_node(&self, id: SegmentId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Weight of the edge `source -> target`, if present
    pub fn edge_weight(&self, source: SegmentId, target: SegmentId) -> Option<u32> {
        self.successors
            .get(&source)?
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, w)| *w)
    }

    /// Predecessors of `id` with edge weights, heaviest first
    pub fn predecessors(&self, id: SegmentId) -> &[(SegmentId, u32)] {
        self.predecessors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Successors of `id` with edge weights, heaviest first
    pub fn successors(&self, id: SegmentId) -> &[(SegmentId, u32)] {
        self.successors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Up to `top_k` predecessor ids of `id`, heaviest first
    pub fn top_predecessors(&self, id: SegmentId, top_k: usize) -> Vec<SegmentId> {
        self.predecessors(id)
            .iter()
            .take(top_k)
            .map(|(n, _)| *n)
            .collect()
    }

    /// Up to `top_k` successor ids of `id`, heaviest first
    pub fn top_successors(&self, id: SegmentId, top_k: usize) -> Vec<SegmentId> {
        self.successors(id)
            .iter()
            .take(top_k)
            .map(|(n, _)| *n)
            .collect()
    }

    /// Induced subgraph on `ids`
    ///
    /// Keeps every requested id that is a node of this graph, even if it has
    /// no edge inside the subgraph.
    pub fn subgraph(&self, ids: &[SegmentId]) -> Self {
        let nodes = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.contains(id))
            .collect::<BTreeSet<_>>();
        let edges = self
            .edges
            .iter()
            .filter(|e| nodes.contains(&e.source) && nodes.contains(&e.target))
            .copied()
            .collect();

        Self::from_parts(nodes, edges)
    }

    /// Copy of this graph without nodes that have no edges
    pub fn without_isolates(&self) -> Self {
        let nodes = self
            .edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .collect::<BTreeSet<_>>();

        Self::from_parts(nodes, self.edges.clone())
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            total_weight: self.edges.iter().map(|e| u64::from(e.weight)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point3;

    fn link(pre: i64, post: i64) -> LinkRecord {
        LinkRecord {
            pre: Point3::default(),
            post: Point3::default(),
            score: 100.0,
            segment_id_pre: SegmentId::new(pre),
            segment_id_post: SegmentId::new(post),
            cleft_score: 0.0,
        }
    }

    fn id(n: i64) -> SegmentId {
        SegmentId::new(n)
    }

    #[test]
    fn test_edge_weights_count_duplicate_pairs() {
        let links = vec![link(1, 2), link(1, 2), link(1, 3)];

        let graph = DirectedWeightedGraph::from_links(&links, 0);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_weight(id(1), id(2)), Some(2));
        assert_eq!(graph.edge_weight(id(1), id(3)), Some(1));
        assert_eq!(graph.node_count(), 3);

        let graph = DirectedWeightedGraph::from_links(&links, 2);
        assert_eq!(graph.edges(), &[Edge { source: id(1), target: id(2), weight: 2 }]);
        assert!(!graph.contains_node(id(3)));
    }

    #[test]
    fn test_background_never_becomes_node() {
        let links = vec![link(0, 2), link(2, 0), link(2, 3)];

        let graph = DirectedWeightedGraph::from_links(&links, 0);
        assert!(!graph.contains_node(SegmentId::BACKGROUND));
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![id(2), id(3)]);
    }

    #[test]
    fn test_direction_matters() {
        let links = vec![link(1, 2), link(2, 1), link(2, 1)];

        let graph = DirectedWeightedGraph::from_links(&links, 0);
        assert_eq!(graph.edge_weight(id(1), id(2)), Some(1));
        assert_eq!(graph.edge_weight(id(2), id(1)), Some(2));
    }

    #[test]
    fn test_neighbors_sorted_by_weight_descending() {
        let mut links = vec![link(10, 1)];
        links.extend(std::iter::repeat_with(|| link(20, 1)).take(3));
        links.extend(std::iter::repeat_with(|| link(30, 1)).take(2));

        let graph = DirectedWeightedGraph::from_links(&links, 0);
        assert_eq!(graph.top_predecessors(id(1), 5), vec![id(20), id(30), id(10)]);
        assert_eq!(graph.top_predecessors(id(1), 2), vec![id(20), id(30)]);
        assert_eq!(graph.top_successors(id(20), 5), vec![id(1)]);
        assert!(graph.top_successors(id(1), 5).is_empty());
    }

    #[test]
    fn test_subgraph_and_isolates() {
        let links = vec![link(1, 2), link(2, 3), link(3, 4)];
        let graph = DirectedWeightedGraph::from_links(&links, 0);

        let sub = graph.subgraph(&[id(1), id(2), id(4), id(99)]);
        assert_eq!(sub.nodes().collect::<Vec<_>>(), vec![id(1), id(2), id(4)]);
        assert_eq!(sub.edge_count(), 1);

        let trimmed = sub.without_isolates();
        assert_eq!(trimmed.nodes().collect::<Vec<_>>(), vec![id(1), id(2)]);
        assert_eq!(trimmed.stats().total_weight, 1);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DirectedWeightedGraph::from_links(&Vec::<LinkRecord>::new(), 0);
        assert!(graph.is_empty());
        assert!(graph.predecessors(id(1)).is_empty());
    }
}
