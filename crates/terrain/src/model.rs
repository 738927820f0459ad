//! The immutable terrain model.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TerrainConfig;
use crate::elevation::ElevationGenerator;
use crate::error::TerrainError;
use crate::grid::ElevationGrid;
use crate::interpolate::Interpolator;
use crate::site::{Bounds, Site};

/// A scattered site with its synthesized elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    pub site: Site,
    pub elevation: f64,
}

/// Seeded elevation field answering queries at arbitrary points.
///
/// Built once from a [`TerrainConfig`]; afterwards only read. The type is
/// `Send + Sync`, so queries may run from many threads at once.
#[derive(Debug, Clone)]
pub struct Terrain {
    bounds: Bounds,
    samples: Vec<TerrainSample>,
    elevations: Vec<f64>,
    interpolator: Interpolator,
}

impl Terrain {
    /// Validates the configuration, scatters the samples and indexes them.
    pub fn build(config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;

        let sites = scatter_sites(&config.bounds, config.sample_count, config.seed);
        debug!("Scattered {} terrain samples", sites.len());

        let relief = ElevationGenerator::new(config.seed, config.bounds, config.elevation);
        let elevations: Vec<f64> = sites.par_iter().map(|s| relief.elevation_at(s)).collect();

        let interpolator =
            Interpolator::new(config.bounds, &sites, config.neighbors, config.idw_power);
        if interpolator.domain().is_degenerate() {
            debug!("Sample hull is degenerate; using the bounds as the query domain");
        }

        let samples = sites
            .iter()
            .zip(&elevations)
            .map(|(site, elevation)| TerrainSample {
                site: *site,
                elevation: *elevation,
            })
            .collect();

        info!(
            "Built terrain: {} samples over {}x{} (seed {})",
            config.sample_count,
            config.bounds.width(),
            config.bounds.height(),
            config.seed
        );

        Ok(Self {
            bounds: config.bounds,
            samples,
            elevations,
            interpolator,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn samples(&self) -> &[TerrainSample] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Whether `site` lies in the sampled domain (inside the bounds and the sample hull).
    pub fn contains(&self, site: &Site) -> bool {
        self.interpolator.contains(site)
    }

    /// Interpolated elevation at `site`.
    ///
    /// Returns `None` ("no data") outside the sampled domain; this is distinct
    /// from an elevation of zero.
    pub fn elevation_at(&self, site: Site) -> Option<f64> {
        self.interpolator.interpolate(&site, &self.elevations)
    }

    /// Elevations along a list of sites.
    pub fn elevation_profile(&self, sites: &[Site]) -> Vec<Option<f64>> {
        sites.par_iter().map(|s| self.elevation_at(*s)).collect()
    }

    /// Samples the field on a regular `width × height` lattice, row by row in parallel.
    pub fn elevation_grid(&self, width: usize, height: usize) -> ElevationGrid {
        let b = self.bounds;
        let cells: Vec<Option<f64>> = (0..height)
            .into_par_iter()
            .flat_map_iter(|iy| {
                let y = b.min.y + b.height() * (iy as f64 / height as f64);
                (0..width).map(move |ix| {
                    let x = b.min.x + b.width() * (ix as f64 / width as f64);
                    self.elevation_at(Site::new(x, y))
                })
            })
            .collect();

        ElevationGrid::new(width, height, cells)
    }
}

/// Draws `count` uniformly distributed sites with a seeded generator.
fn scatter_sites(bounds: &Bounds, count: usize, seed: u32) -> Vec<Site> {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    (0..count).map(|_| bounds.random_site(&mut rng)).collect()
}
