//! Arena-backed road graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use terrain::Site;

use crate::error::NetworkError;

/// Index of a road node in the arena.
pub type NodeId = usize;

/// An adjacent node as seen from a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: NodeId,
    pub is_highway: bool,
}

/// A road segment, stored parent side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub a: NodeId,
    pub b: NodeId,
    pub is_highway: bool,
}

impl Segment {
    /// Whether `id` is one of the endpoints.
    pub fn touches(&self, id: NodeId) -> bool {
        self.a == id || self.b == id
    }
}

fn pair_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a < b { (a, b) } else { (b, a) }
}

/// Road nodes and segments with per-node adjacency.
///
/// Nodes are only appended. Segments are only appended, except that a
/// junction may split one segment into two halves that keep its highway flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkGraph {
    sites: Vec<Site>,
    segments: Vec<Segment>,
    adjacency: Vec<Vec<Neighbor>>,
    pairs: HashSet<(NodeId, NodeId)>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.sites.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn highway_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_highway).count()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Site of a node.
    pub fn site_of(&self, id: NodeId) -> Result<Site, NetworkError> {
        self.sites
            .get(id)
            .copied()
            .ok_or(NetworkError::InvalidIndex {
                index: id,
                count: self.sites.len(),
            })
    }

    /// Adjacent nodes of a node, in the order their segments were created.
    pub fn neighbors_of(&self, id: NodeId) -> Result<&[Neighbor], NetworkError> {
        self.adjacency
            .get(id)
            .map(Vec::as_slice)
            .ok_or(NetworkError::InvalidIndex {
                index: id,
                count: self.sites.len(),
            })
    }

    /// Whether a segment joins `a` and `b`, in either direction.
    pub fn has_segment(&self, a: NodeId, b: NodeId) -> bool {
        self.pairs.contains(&pair_key(a, b))
    }

    pub(crate) fn add_node(&mut self, site: Site) -> NodeId {
        let id = self.sites.len();
        self.sites.push(site);
        self.adjacency.push(Vec::new());
        id
    }

    /// Appends a segment. Returns `None` for self-loops and duplicates.
    pub(crate) fn add_segment(&mut self, a: NodeId, b: NodeId, is_highway: bool) -> Option<usize> {
        if a == b || a >= self.sites.len() || b >= self.sites.len() {
            return None;
        }
        if !self.pairs.insert(pair_key(a, b)) {
            return None;
        }
        self.adjacency[a].push(Neighbor { id: b, is_highway });
        self.adjacency[b].push(Neighbor { id: a, is_highway });
        let id = self.segments.len();
        self.segments.push(Segment { a, b, is_highway });
        Some(id)
    }

    /// Splits segment `segment_id` at node `via`.
    ///
    /// The segment keeps its id as `a → via`; the `via → b` half is appended and
    /// its id returned. Both halves inherit the highway flag.
    pub(crate) fn split_segment(&mut self, segment_id: usize, via: NodeId) -> usize {
        let Segment { a, b, is_highway } = self.segments[segment_id];

        self.pairs.remove(&pair_key(a, b));
        self.pairs.insert(pair_key(a, via));
        self.pairs.insert(pair_key(via, b));

        for neighbor in self.adjacency[a].iter_mut().filter(|n| n.id == b) {
            neighbor.id = via;
        }
        for neighbor in self.adjacency[b].iter_mut().filter(|n| n.id == a) {
            neighbor.id = via;
        }
        self.adjacency[via].push(Neighbor { id: a, is_highway });
        self.adjacency[via].push(Neighbor { id: b, is_highway });

        self.segments[segment_id] = Segment {
            a,
            b: via,
            is_highway,
        };
        let tail = self.segments.len();
        self.segments.push(Segment {
            a: via,
            b,
            is_highway,
        });
        tail
    }

    pub(crate) fn segment(&self, id: usize) -> Segment {
        self.segments[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        let a = graph.add_node(Site::new(0.0, 0.0));
        let b = graph.add_node(Site::new(1.0, 0.0));
        let c = graph.add_node(Site::new(0.0, 1.0));
        graph.add_segment(a, b, true);
        graph.add_segment(b, c, false);
        graph
    }

    #[test]
    fn test_neighbors_carry_highway_flag() {
        let graph = triangle();
        assert_eq!(
            graph.neighbors_of(1).unwrap(),
            &[
                Neighbor {
                    id: 0,
                    is_highway: true,
                },
                Neighbor {
                    id: 2,
                    is_highway: false,
                },
            ]
        );
        assert_eq!(graph.highway_count(), 1);
    }

    #[test]
    fn test_rejects_duplicates_and_loops() {
        let mut graph = triangle();
        assert_eq!(graph.add_segment(1, 0, false), None);
        assert_eq!(graph.add_segment(2, 2, false), None);
        assert_eq!(graph.add_segment(0, 7, false), None);
        assert_eq!(graph.add_segment(0, 2, false), Some(2));
        assert_eq!(graph.segment_count(), 3);
    }

    #[test]
    fn test_invalid_index() {
        let graph = triangle();
        assert_eq!(
            graph.site_of(3),
            Err(NetworkError::InvalidIndex { index: 3, count: 3 })
        );
        assert!(graph.neighbors_of(99).is_err());
        assert_eq!(graph.site_of(2), Ok(Site::new(0.0, 1.0)));
    }

    #[test]
    fn test_split_segment_keeps_flag() {
        let mut graph = triangle();
        let mid = graph.add_node(Site::new(0.5, 0.0));
        let tail = graph.split_segment(0, mid);

        assert!(!graph.has_segment(0, 1));
        assert!(graph.has_segment(0, mid));
        assert!(graph.has_segment(mid, 1));
        assert_eq!(
            graph.segment(0),
            Segment {
                a: 0,
                b: mid,
                is_highway: true,
            }
        );
        assert_eq!(
            graph.segment(tail),
            Segment {
                a: mid,
                b: 1,
                is_highway: true,
            }
        );

        let ids: Vec<NodeId> = graph
            .neighbors_of(mid)
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![0, 1]);
        assert!(graph.neighbors_of(0).unwrap().iter().all(|n| n.id != 1));
    }
}
