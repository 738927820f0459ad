//! Perlin noise-based relief synthesis.

use noise::{NoiseFn, Perlin};

use crate::config::ElevationConfig;
use crate::site::{Bounds, Site};

/// Deterministic, continuous relief function over a bounded rectangle.
///
/// Layers several octaves of Perlin noise (fractal Brownian motion) over the
/// normalized domain and subtracts a radial falloff so the rim of the bounds
/// sinks toward sea level.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    bounds: Bounds,
    config: ElevationConfig,
}

impl ElevationGenerator {
    pub fn new(seed: u32, bounds: Bounds, config: ElevationConfig) -> Self {
        Self {
            perlin: Perlin::new(seed),
            bounds,
            config,
        }
    }

    /// Fractal noise at normalized coordinates, in roughly `[-1, 1]`.
    fn fbm(&self, u: f64, v: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.config.octaves {
            total += self.perlin.get([u * frequency, v * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.config.persistence;
            frequency *= 2.0;
        }

        total / max_amplitude
    }

    /// Elevation of the relief function at a site.
    ///
    /// Defined everywhere; callers decide whether the site is in the sampled domain.
    pub fn elevation_at(&self, site: &Site) -> f64 {
        let u = (site.x - self.bounds.min.x) / self.bounds.width();
        let v = (site.y - self.bounds.min.y) / self.bounds.height();

        // Squared distance from the center, scaled so the edge midpoints sit at 1.
        let rim = ((u - 0.5).powi(2) + (v - 0.5).powi(2)) * 4.0;
        let relief = self.fbm(u, v) * 0.5 + 0.5 - self.config.edge_falloff * rim;

        self.config.base_elevation + self.config.height_scale * relief
    }
}
