//! Pending growth candidates and their priority queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::{NetworkConfig, RoadClass};
use crate::graph::NodeId;

/// A proposed road segment waiting to be resolved.
///
/// Equality and ordering look only at the queue position: priority, then sequence.
#[derive(Debug, Clone, Copy)]
pub struct GrowthCandidate {
    /// Node the segment grows from.
    pub parent: NodeId,
    /// Nominal heading in radians.
    pub heading: f64,
    pub class: RoadClass,
    /// Road length from the start node to `parent` along this branch.
    pub accumulated_length: f64,
    pub priority: f64,
    /// Insertion order, used to break priority ties.
    pub sequence: u64,
}

/// `boost / (1 + weight · accumulated_length)`, with the class's boost and weight.
pub fn candidate_priority(
    config: &NetworkConfig,
    class: RoadClass,
    accumulated_length: f64,
) -> f64 {
    let (boost, weight) = config.class_weights(class);
    boost / (1.0 + weight * accumulated_length)
}

impl PartialEq for GrowthCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GrowthCandidate {}

impl Ord for GrowthCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority first, then earlier insertion.
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for GrowthCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-priority queue with deterministic FIFO tie-breaking.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    heap: BinaryHeap<GrowthCandidate>,
    next_sequence: u64,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a candidate, scoring it against `config`.
    pub fn push(
        &mut self,
        config: &NetworkConfig,
        parent: NodeId,
        heading: f64,
        class: RoadClass,
        accumulated_length: f64,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(GrowthCandidate {
            parent,
            heading,
            class,
            accumulated_length,
            priority: candidate_priority(config, class, accumulated_length),
            sequence,
        });
    }

    pub fn pop(&mut self) -> Option<GrowthCandidate> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
