//! Road and highway networks grown over a terrain.
//!
//! Growth starts from a single node and two opposing highway candidates.
//! Candidates are resolved highest priority first; accepted segments queue a
//! continuation plus optional perpendicular local branches. New endpoints snap
//! onto nearby nodes, and crossings either become junctions or are rejected.
//!
//! # Quick Start
//!
//! ```rust
//! use transport::prelude::*;
//!
//! let terrain = Terrain::build(
//!     TerrainConfig::new(Bounds::new(60.0, 60.0), 7).with_sample_count(1_000),
//! )?;
//! let config = NetworkConfig::new(Site::new(30.0, 30.0), 500, 7)
//!     .with_admissibility(TerrainAdmissibility::dry_land());
//!
//! let network = TransportNetwork::grow(config, Some(&terrain))?;
//! for neighbor in network.neighbors_of(0)? {
//!     let site = network.site_of(neighbor.id)?;
//!     println!("{} at ({:.1}, {:.1})", neighbor.id, site.x, site.y);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod candidate;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod growth;
mod index;
pub mod network;
pub mod snapshot;

pub use config::{
    GridSize, IntersectionPolicy, NetworkConfig, RoadClass, TerrainAdmissibility, WorldConfig,
};
pub use error::NetworkError;
pub use graph::{Neighbor, NetworkGraph, NodeId, Segment};
pub use growth::{GrowthEngine, GrowthStats, Rejection, Resolution};
pub use network::TransportNetwork;
pub use snapshot::{NodeRecord, WorldSnapshot};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{
        IntersectionPolicy, NetworkConfig, RoadClass, TerrainAdmissibility, WorldConfig,
    };
    pub use crate::error::NetworkError;
    pub use crate::graph::{Neighbor, NodeId};
    pub use crate::growth::{GrowthEngine, Resolution};
    pub use crate::network::TransportNetwork;
    pub use crate::snapshot::WorldSnapshot;
    pub use terrain::{Bounds, Site, Terrain, TerrainConfig};
}
