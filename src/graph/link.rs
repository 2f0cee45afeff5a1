//! Synaptic link records
//!
//! A `LinkRecord` is one row of the link table: a detected synapse between a
//! pre-synaptic and a post-synaptic segment.

use super::ids::SegmentId;
use serde::{Deserialize, Serialize};

/// A point in dataset space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn bits(&self) -> [u64; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }
}

/// One synaptic link as stored in the backing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Pre-synaptic location (pre_x, pre_y, pre_z)
    pub pre: Point3,

    /// Post-synaptic location (post_x, post_y, post_z)
    pub post: Point3,

    /// Synapse confidence score
    pub score: f64,

    pub segment_id_pre: SegmentId,
    pub segment_id_post: SegmentId,

    /// Cleft confidence score
    pub cleft_score: f64,
}

/// Bitwise identity of a record across all fields, used for deduplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LinkKey {
    pre: [u64; 3],
    post: [u64; 3],
    score: u64,
    segment_id_pre: SegmentId,
    segment_id_post: SegmentId,
    cleft_score: u64,
}

impl LinkRecord {
    /// Ordered (pre, post) pair of this link
    pub fn pair(&self) -> (SegmentId, SegmentId) {
        (self.segment_id_pre, self.segment_id_post)
    }

    /// Whether pre and post segment are the same
    pub fn is_autapse(&self) -> bool {
        self.segment_id_pre == self.segment_id_post
    }

    /// Whether either endpoint is the background label
    pub fn touches_background(&self) -> bool {
        self.segment_id_pre.is_background() || self.segment_id_post.is_background()
    }

    /// Whether `id` is the pre or post segment
    pub fn involves(&self, id: SegmentId) -> bool {
        self.segment_id_pre == id || self.segment_id_post == id
    }

    /// Whether this record links `a` and `b`, in either direction
    pub fn connects(&self, a: SegmentId, b: SegmentId) -> bool {
        self.pair() == (a, b) || self.pair() == (b, a)
    }

    pub(crate) fn key(&self) -> LinkKey {
        LinkKey {
            pre: self.pre.bits(),
            post: self.post.bits(),
            score: self.score.to_bits(),
            segment_id_pre: self.segment_id_pre,
            segment_id_post: self.segment_id_post,
            cleft_score: self.cleft_score.to_bits(),
        }
    }
}
