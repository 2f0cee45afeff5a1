//! Core graph data structures
//!
//! Defines SegmentId, LinkRecord and the DirectedWeightedGraph derived from
//! cached links.

mod ids;
mod link;
mod weighted_graph;

pub use ids::SegmentId;
pub(crate) use link::LinkKey;
pub use link::{LinkRecord, Point3};
pub use weighted_graph::{DirectedWeightedGraph, Edge, GraphStats};
