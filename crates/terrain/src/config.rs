//! Configuration types for terrain generation.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::site::Bounds;

/// Largest sample count accepted by [`TerrainConfig::validate`].
pub const MAX_SAMPLE_COUNT: usize = 2_000_000;

/// Largest number of neighbours blended by one elevation query.
pub const MAX_NEIGHBORS: usize = 64;

/// Parameters of the synthetic relief function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Elevation offset added everywhere.
    pub base_elevation: f64,
    /// Scale factor for relief amplitude.
    pub height_scale: f64,
    /// Spatial frequency over the normalized `[0, 1]²` domain.
    pub frequency: f64,
    /// Number of noise octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// How strongly relief drops toward the rim of the bounds.
    /// Zero gives no rim; larger values sink the corners below zero.
    pub edge_falloff: f64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self::island()
    }
}

impl ElevationConfig {
    /// Land mass in the middle, sea toward the corners.
    pub fn island() -> Self {
        Self {
            base_elevation: 0.0,
            height_scale: 10.0,
            frequency: 3.0,
            octaves: 6,
            persistence: 0.5,
            edge_falloff: 0.6,
        }
    }

    /// Gentle rolling terrain that stays above zero.
    pub fn flat() -> Self {
        Self {
            base_elevation: 1.0,
            height_scale: 1.0,
            frequency: 1.5,
            octaves: 2,
            persistence: 0.5,
            edge_falloff: 0.0,
        }
    }

    /// High-amplitude, detailed relief.
    pub fn rugged() -> Self {
        Self {
            base_elevation: 0.0,
            height_scale: 40.0,
            frequency: 5.0,
            octaves: 8,
            persistence: 0.55,
            edge_falloff: 0.3,
        }
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if !self.base_elevation.is_finite() {
            return Err(invalid("base_elevation", self.base_elevation, "must be finite"));
        }
        if !self.height_scale.is_finite() || self.height_scale < 0.0 {
            return Err(invalid(
                "height_scale",
                self.height_scale,
                "must be finite and non-negative",
            ));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(invalid("frequency", self.frequency, "must be finite and positive"));
        }
        if !(1..=16).contains(&self.octaves) {
            return Err(invalid("octaves", self.octaves as f64, "must be between 1 and 16"));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(invalid("persistence", self.persistence, "must be in (0, 1]"));
        }
        if !self.edge_falloff.is_finite() || self.edge_falloff < 0.0 {
            return Err(invalid(
                "edge_falloff",
                self.edge_falloff,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Everything needed to build a [`Terrain`](crate::Terrain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Rectangle the samples are scattered over.
    pub bounds: Bounds,
    /// Number of scattered samples.
    pub sample_count: usize,
    /// Seed for both scattering and relief.
    pub seed: u32,
    /// Relief function parameters.
    pub elevation: ElevationConfig,
    /// Nearest samples blended per query.
    pub neighbors: usize,
    /// Exponent of the inverse-distance weights.
    pub idw_power: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            sample_count: 10_000,
            seed: 0,
            elevation: ElevationConfig::default(),
            neighbors: 8,
            idw_power: 2.0,
        }
    }
}

impl TerrainConfig {
    /// Creates a configuration with default settings for the given bounds and seed.
    pub fn new(bounds: Bounds, seed: u32) -> Self {
        Self {
            bounds,
            seed,
            ..Default::default()
        }
    }

    /// Sets the bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the number of samples.
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the relief parameters.
    pub fn with_elevation(mut self, elevation: ElevationConfig) -> Self {
        self.elevation = elevation;
        self
    }

    /// Sets interpolation parameters.
    pub fn with_interpolation(mut self, neighbors: usize, idw_power: f64) -> Self {
        self.neighbors = neighbors;
        self.idw_power = idw_power;
        self
    }

    /// Single validation point; nothing is clamped.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.bounds.validate()?;
        if self.sample_count == 0 || self.sample_count > MAX_SAMPLE_COUNT {
            return Err(TerrainError::InvalidSampleCount(self.sample_count));
        }
        if self.neighbors == 0 || self.neighbors > MAX_NEIGHBORS {
            return Err(invalid(
                "neighbors",
                self.neighbors as f64,
                "must be between 1 and 64",
            ));
        }
        if !self.idw_power.is_finite() || self.idw_power <= 0.0 {
            return Err(invalid("idw_power", self.idw_power, "must be finite and positive"));
        }
        self.elevation.validate()
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> TerrainError {
    TerrainError::InvalidParameter {
        name,
        value,
        reason,
    }
}
