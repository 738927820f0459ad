//! Seeded terrain elevation field.
//!
//! A [`Terrain`] scatters a fixed number of sample sites over a rectangle with a
//! seeded generator, assigns each an elevation from a layered Perlin relief
//! function and answers elevation queries anywhere in the sampled domain by
//! inverse-distance weighting over the nearest samples.
//!
//! # Quick Start
//!
//! ```rust
//! use terrain::prelude::*;
//!
//! let terrain = Terrain::build(
//!     TerrainConfig::new(Bounds::new(100.0, 100.0), 42).with_sample_count(2_000),
//! )?;
//!
//! match terrain.elevation_at(Site::new(50.0, 50.0)) {
//!     Some(elevation) => println!("elevation {elevation:.2}"),
//!     None => println!("no data"),
//! }
//! # Ok::<(), terrain::TerrainError>(())
//! ```

pub mod config;
pub mod elevation;
pub mod error;
pub mod grid;
mod interpolate;
pub mod model;
pub mod site;

pub use config::{ElevationConfig, TerrainConfig};
pub use error::TerrainError;
pub use grid::ElevationGrid;
pub use model::{Terrain, TerrainSample};
pub use site::{Bounds, Site};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{ElevationConfig, TerrainConfig};
    pub use crate::error::TerrainError;
    pub use crate::model::{Terrain, TerrainSample};
    pub use crate::site::{Bounds, Site};
}
