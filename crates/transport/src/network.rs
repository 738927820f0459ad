//! The finished, read-only road network.

use terrain::{Bounds, Site, Terrain};
use tracing::info;

use crate::config::NetworkConfig;
use crate::error::NetworkError;
use crate::graph::{Neighbor, NetworkGraph, NodeId, Segment};
use crate::growth::{GrowthEngine, GrowthStats};

/// A grown road network.
///
/// Node ids are dense and assigned in creation order, so the id of a node is
/// also its position in [`TransportNetwork::sites`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportNetwork {
    graph: NetworkGraph,
    bounds: Bounds,
    stats: GrowthStats,
}

impl TransportNetwork {
    pub(crate) fn new(graph: NetworkGraph, bounds: Bounds, stats: GrowthStats) -> Self {
        info!(
            "Grew network: {} nodes, {} segments ({} highway) from {} candidates ({} rejected)",
            graph.node_count(),
            graph.segment_count(),
            graph.highway_count(),
            stats.resolved,
            stats.rejected()
        );
        Self {
            graph,
            bounds,
            stats,
        }
    }

    /// Grows a network over `terrain`, or over `config.bounds` when there is none.
    pub fn grow(config: NetworkConfig, terrain: Option<&Terrain>) -> Result<Self, NetworkError> {
        Ok(GrowthEngine::new(config, terrain)?.finish())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn segment_count(&self) -> usize {
        self.graph.segment_count()
    }

    pub fn highway_count(&self) -> usize {
        self.graph.highway_count()
    }

    /// Position of node `id`.
    pub fn site_of(&self, id: NodeId) -> Result<Site, NetworkError> {
        self.graph.site_of(id)
    }

    /// Nodes joined to `id`, each tagged with the class of the joining segment.
    pub fn neighbors_of(&self, id: NodeId) -> Result<&[Neighbor], NetworkError> {
        self.graph.neighbors_of(id)
    }

    pub fn has_segment(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.has_segment(a, b)
    }

    pub fn sites(&self) -> &[Site] {
        self.graph.sites()
    }

    pub fn segments(&self) -> &[Segment] {
        self.graph.segments()
    }

    /// The rectangle growth was confined to.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn stats(&self) -> &GrowthStats {
        &self.stats
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }
}
