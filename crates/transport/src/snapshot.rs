//! Write-only JSON export of a generated world, for rendering.

use serde::Serialize;
use terrain::{Bounds, ElevationGrid, Site, Terrain};

use crate::graph::Segment;
use crate::growth::GrowthStats;
use crate::network::TransportNetwork;

/// A road node with the terrain elevation under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: usize,
    pub site: Site,
    pub elevation: Option<f64>,
}

/// Everything needed to draw a generated world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub bounds: Bounds,
    pub sample_count: usize,
    pub nodes: Vec<NodeRecord>,
    pub segments: Vec<Segment>,
    pub stats: GrowthStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<ElevationGrid>,
}

impl WorldSnapshot {
    /// Captures `network`, annotating nodes with elevations from `terrain` if given.
    pub fn capture(network: &TransportNetwork, terrain: Option<&Terrain>) -> Self {
        let nodes = network
            .sites()
            .iter()
            .enumerate()
            .map(|(id, &site)| NodeRecord {
                id,
                site,
                elevation: terrain.and_then(|t| t.elevation_at(site)),
            })
            .collect();

        Self {
            bounds: network.bounds(),
            sample_count: terrain.map_or(0, Terrain::sample_count),
            nodes,
            segments: network.segments().to_vec(),
            stats: *network.stats(),
            grid: None,
        }
    }

    /// Attaches an elevation grid.
    pub fn with_grid(mut self, grid: ElevationGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
