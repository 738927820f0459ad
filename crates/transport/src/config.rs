//! Configuration types for network growth.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use terrain::{Bounds, Site, TerrainConfig};

use crate::error::NetworkError;

/// Hard ceiling on the iteration budget, so growth always terminates in bounded time.
pub const MAX_ITERATIONS: usize = 5_000_000;

/// Elevation below which the sea-level policies treat land as unbuildable.
pub const DEFAULT_SEA_LEVEL: f64 = 1e-3;

/// Road class of a segment or candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Highway,
    Local,
}

impl RoadClass {
    pub fn is_highway(self) -> bool {
        matches!(self, RoadClass::Highway)
    }
}

/// What to do when a proposed segment crosses an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionPolicy {
    /// End the new segment at the crossing, creating a junction.
    #[default]
    Snap,
    /// Drop the candidate.
    Reject,
}

/// Decides whether terrain at a proposed endpoint can carry a road.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum TerrainAdmissibility {
    /// Any site with elevation data.
    #[default]
    RequireData,
    /// Sites at or above `sea_level`.
    AboveSeaLevel { sea_level: f64 },
    /// Above sea level, and no steeper than `max_grade` (rise over run) from the parent.
    MaxGrade { sea_level: f64, max_grade: f64 },
}

impl TerrainAdmissibility {
    /// Dry land only, at [`DEFAULT_SEA_LEVEL`].
    pub fn dry_land() -> Self {
        Self::AboveSeaLevel {
            sea_level: DEFAULT_SEA_LEVEL,
        }
    }

    /// `from` is the parent's elevation, `to` the endpoint's; `run` the horizontal distance.
    pub fn admits(&self, from: Option<f64>, to: Option<f64>, run: f64) -> bool {
        let Some(to) = to else {
            return false;
        };
        match *self {
            TerrainAdmissibility::RequireData => true,
            TerrainAdmissibility::AboveSeaLevel { sea_level } => to >= sea_level,
            TerrainAdmissibility::MaxGrade {
                sea_level,
                max_grade,
            } => {
                if to < sea_level {
                    return false;
                }
                match from {
                    Some(from) if run > 0.0 => (to - from).abs() / run <= max_grade,
                    _ => true,
                }
            }
        }
    }

    fn validate(&self) -> Result<(), NetworkError> {
        match *self {
            TerrainAdmissibility::RequireData => Ok(()),
            TerrainAdmissibility::AboveSeaLevel { sea_level } => {
                require(sea_level.is_finite(), "sea_level must be finite")
            }
            TerrainAdmissibility::MaxGrade {
                sea_level,
                max_grade,
            } => {
                require(sea_level.is_finite(), "sea_level must be finite")?;
                require(
                    max_grade.is_finite() && max_grade >= 0.0,
                    "max_grade must be finite and non-negative",
                )
            }
        }
    }
}

/// Parameters of one network growth run.
///
/// Angles are radians. Validated once by [`NetworkConfig::validate`]; values
/// are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Seed node of the network.
    pub start: Site,
    /// Containment rectangle when no terrain is supplied.
    pub bounds: Option<Bounds>,
    /// Number of candidates resolved before growth stops.
    pub iterations: usize,
    /// Seed of the growth random generator.
    pub seed: u64,

    /// Step length of a local road segment.
    pub branch_length: f64,
    /// Highway step length relative to `branch_length`.
    pub highway_length_factor: f64,
    /// Largest random heading jitter when continuing straight; also the rotation fan step.
    pub branch_angle_deviation: f64,
    /// Widest heading offset a rotation may choose.
    pub branch_max_angle: f64,
    /// Chance, per side, of spawning a local side branch from a new node.
    pub branch_probability: f64,

    /// Chance that a local step rotates toward a better heading instead of going straight.
    pub normal_rotation_probability: f64,
    /// Same for highways.
    pub highway_rotation_probability: f64,

    /// Priority multiplier for highway candidates.
    pub highway_construction_priority: f64,
    /// Penalty per unit of accumulated length for local roads.
    pub even_path_length_weight: f64,
    /// Penalty per unit of accumulated length for highways.
    pub highway_path_length_weight: f64,

    /// Snap tolerance as a fraction of the shorter step length.
    pub snap_factor: f64,
    pub intersection_policy: IntersectionPolicy,
    pub admissibility: TerrainAdmissibility,

    /// Site rotations steer toward.
    pub target: Option<Site>,
    /// Strength of the pull toward `target`.
    pub target_pull: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            start: Site::new(50.0, 50.0),
            bounds: None,
            iterations: 1000,
            seed: 0,
            branch_length: 1.0,
            highway_length_factor: 1.0,
            branch_angle_deviation: 0.1,
            branch_max_angle: 0.5,
            branch_probability: 0.3,
            normal_rotation_probability: 0.3,
            highway_rotation_probability: 0.1,
            highway_construction_priority: 4.0,
            even_path_length_weight: 0.1,
            highway_path_length_weight: 0.02,
            snap_factor: 0.8,
            intersection_policy: IntersectionPolicy::Snap,
            admissibility: TerrainAdmissibility::RequireData,
            target: None,
            target_pull: 1.0,
        }
    }
}

impl NetworkConfig {
    /// Creates a configuration with default geometry at `start`.
    pub fn new(start: Site, iterations: usize, seed: u64) -> Self {
        Self {
            start,
            iterations,
            seed,
            ..Default::default()
        }
    }

    /// Dense, curvy street grid favouring local roads.
    pub fn town(start: Site, seed: u64) -> Self {
        Self {
            branch_probability: 0.6,
            normal_rotation_probability: 0.5,
            highway_construction_priority: 2.0,
            even_path_length_weight: 0.2,
            ..Self::new(start, 3000, seed)
        }
    }

    /// Long, straight highways with sparse local roads.
    pub fn regional(start: Site, seed: u64) -> Self {
        Self {
            highway_length_factor: 2.0,
            branch_probability: 0.1,
            highway_rotation_probability: 0.05,
            highway_construction_priority: 20.0,
            highway_path_length_weight: 0.005,
            admissibility: TerrainAdmissibility::dry_land(),
            ..Self::new(start, 3000, seed)
        }
    }

    /// Sets the containment rectangle used without terrain.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets the iteration budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the branch geometry.
    pub fn with_branch_geometry(
        mut self,
        length: f64,
        angle_deviation: f64,
        max_angle: f64,
    ) -> Self {
        self.branch_length = length;
        self.branch_angle_deviation = angle_deviation;
        self.branch_max_angle = max_angle;
        self
    }

    /// Sets the side branch probability.
    pub fn with_branch_probability(mut self, probability: f64) -> Self {
        self.branch_probability = probability;
        self
    }

    /// Sets the rotation probabilities for local roads and highways.
    pub fn with_rotation_probabilities(mut self, normal: f64, highway: f64) -> Self {
        self.normal_rotation_probability = normal;
        self.highway_rotation_probability = highway;
        self
    }

    /// Sets the crossing policy.
    pub fn with_intersection_policy(mut self, policy: IntersectionPolicy) -> Self {
        self.intersection_policy = policy;
        self
    }

    /// Sets the terrain admissibility policy.
    pub fn with_admissibility(mut self, admissibility: TerrainAdmissibility) -> Self {
        self.admissibility = admissibility;
        self
    }

    /// Sets the growth target.
    pub fn with_target(mut self, target: Site, pull: f64) -> Self {
        self.target = Some(target);
        self.target_pull = pull;
        self
    }

    /// Step length for a road class.
    pub fn step_length(&self, class: RoadClass) -> f64 {
        match class {
            RoadClass::Highway => self.branch_length * self.highway_length_factor,
            RoadClass::Local => self.branch_length,
        }
    }

    /// Minimum distance between distinct nodes.
    pub fn snap_tolerance(&self) -> f64 {
        self.snap_factor
            * self
                .step_length(RoadClass::Local)
                .min(self.step_length(RoadClass::Highway))
    }

    pub fn rotation_probability(&self, class: RoadClass) -> f64 {
        match class {
            RoadClass::Highway => self.highway_rotation_probability,
            RoadClass::Local => self.normal_rotation_probability,
        }
    }

    /// Priority boost and length weight for a road class.
    pub fn class_weights(&self, class: RoadClass) -> (f64, f64) {
        match class {
            RoadClass::Highway => (
                self.highway_construction_priority,
                self.highway_path_length_weight,
            ),
            RoadClass::Local => (1.0, self.even_path_length_weight),
        }
    }

    /// Checks every option against its valid range, resolving the bounds growth will use.
    ///
    /// `terrain_bounds` wins over `self.bounds` when present.
    pub fn validate(&self, terrain_bounds: Option<Bounds>) -> Result<Bounds, NetworkError> {
        let bounds = match (terrain_bounds, self.bounds) {
            (Some(bounds), _) => bounds,
            (None, Some(bounds)) => {
                bounds.validate()?;
                bounds
            }
            (None, None) => {
                return Err(NetworkError::Configuration(
                    "bounds are required when no terrain is supplied".to_string(),
                ));
            }
        };

        require(self.start.is_finite(), "start must be finite")?;
        require(bounds.contains(&self.start), "start must lie within the bounds")?;
        require(
            self.iterations <= MAX_ITERATIONS,
            "iterations exceeds the safety cap",
        )?;

        require(
            self.branch_length.is_finite() && self.branch_length > 0.0,
            "branch_length must be finite and positive",
        )?;
        require(
            self.highway_length_factor.is_finite() && self.highway_length_factor > 0.0,
            "highway_length_factor must be finite and positive",
        )?;
        require(
            (0.0..=PI).contains(&self.branch_angle_deviation),
            "branch_angle_deviation must be in [0, pi]",
        )?;
        require(
            (0.0..=PI).contains(&self.branch_max_angle),
            "branch_max_angle must be in [0, pi]",
        )?;

        for (name, p) in [
            ("branch_probability", self.branch_probability),
            ("normal_rotation_probability", self.normal_rotation_probability),
            ("highway_rotation_probability", self.highway_rotation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NetworkError::Configuration(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }

        require(
            self.highway_construction_priority.is_finite()
                && self.highway_construction_priority > 0.0,
            "highway_construction_priority must be finite and positive",
        )?;
        require(
            self.even_path_length_weight.is_finite() && self.even_path_length_weight >= 0.0,
            "even_path_length_weight must be finite and non-negative",
        )?;
        require(
            self.highway_path_length_weight.is_finite() && self.highway_path_length_weight >= 0.0,
            "highway_path_length_weight must be finite and non-negative",
        )?;
        require(
            self.snap_factor > 0.0 && self.snap_factor < 1.0,
            "snap_factor must be in (0, 1)",
        )?;
        self.admissibility.validate()?;

        if let Some(target) = self.target {
            require(
                target.is_finite() && bounds.contains(&target),
                "target must lie within the bounds",
            )?;
        }
        require(
            self.target_pull.is_finite() && self.target_pull >= 0.0,
            "target_pull must be finite and non-negative",
        )?;

        Ok(bounds)
    }
}

fn require(condition: bool, message: &str) -> Result<(), NetworkError> {
    if condition {
        Ok(())
    } else {
        Err(NetworkError::Configuration(message.to_string()))
    }
}

/// Terrain and network settings for one generated world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub terrain: TerrainConfig,
    pub network: NetworkConfig,
    /// Resolution of the exported elevation grid, if any.
    pub grid: Option<GridSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded() -> NetworkConfig {
        NetworkConfig::default().with_bounds(Bounds::new(100.0, 100.0))
    }

    #[test]
    fn test_default_is_valid_with_bounds() {
        assert_eq!(bounded().validate(None), Ok(Bounds::new(100.0, 100.0)));

        let small = Bounds::new(20.0, 20.0);
        let town = NetworkConfig::town(Site::new(10.0, 10.0), 1).with_bounds(small);
        assert!(town.validate(None).is_ok());
        let regional = NetworkConfig::regional(Site::new(10.0, 10.0), 1);
        assert!(regional.validate(Some(small)).is_ok());
    }

    #[test]
    fn test_requires_bounds_without_terrain() {
        let result = NetworkConfig::default().validate(None);
        assert!(matches!(result, Err(NetworkError::Configuration(_))));
    }

    #[test]
    fn test_terrain_bounds_take_precedence() {
        let config = NetworkConfig::default().with_bounds(Bounds::new(10.0, 10.0));
        // Start (50, 50) is outside the configured bounds but inside the terrain's.
        assert_eq!(
            config.validate(Some(Bounds::new(100.0, 100.0))),
            Ok(Bounds::new(100.0, 100.0))
        );
        assert!(config.validate(None).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases: Vec<NetworkConfig> = vec![
            bounded().with_branch_probability(1.5),
            bounded().with_branch_probability(-0.1),
            bounded().with_rotation_probabilities(0.2, 2.0),
            bounded().with_branch_geometry(0.0, 0.1, 0.5),
            bounded().with_branch_geometry(1.0, -0.1, 0.5),
            bounded().with_branch_geometry(1.0, 0.1, 4.0),
            bounded().with_iterations(MAX_ITERATIONS + 1),
            NetworkConfig {
                highway_construction_priority: 0.0,
                ..bounded()
            },
            NetworkConfig {
                even_path_length_weight: -1.0,
                ..bounded()
            },
            NetworkConfig {
                snap_factor: 1.0,
                ..bounded()
            },
            NetworkConfig {
                start: Site::new(150.0, 5.0),
                ..bounded()
            },
            bounded().with_target(Site::new(-3.0, 5.0), 1.0),
            bounded().with_admissibility(TerrainAdmissibility::MaxGrade {
                sea_level: 0.0,
                max_grade: f64::NAN,
            }),
            bounded().with_admissibility(TerrainAdmissibility::AboveSeaLevel {
                sea_level: f64::NAN,
            }),
            bounded().with_branch_geometry(1.0, 0.1, -0.2),
            bounded().with_branch_geometry(f64::INFINITY, 0.1, 0.5),
            bounded().with_target(Site::new(10.0, 10.0), -1.0),
            NetworkConfig {
                highway_length_factor: 0.0,
                ..bounded()
            },
            NetworkConfig {
                highway_path_length_weight: -0.5,
                ..bounded()
            },
            NetworkConfig {
                highway_construction_priority: f64::NAN,
                ..bounded()
            },
            NetworkConfig {
                snap_factor: 0.0,
                ..bounded()
            },
            NetworkConfig {
                start: Site::new(f64::NAN, 5.0),
                ..bounded()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(None), Err(NetworkError::Configuration(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_snap_tolerance_uses_shorter_step() {
        let config = NetworkConfig {
            branch_length: 2.0,
            highway_length_factor: 0.5,
            snap_factor: 0.5,
            ..bounded()
        };
        assert_eq!(config.step_length(RoadClass::Highway), 1.0);
        assert_eq!(config.snap_tolerance(), 0.5);
    }

    #[test]
    fn test_admissibility_policies() {
        let any = TerrainAdmissibility::RequireData;
        assert!(any.admits(None, Some(-5.0), 1.0));
        assert!(!any.admits(Some(1.0), None, 1.0));

        let dry = TerrainAdmissibility::dry_land();
        assert!(dry.admits(None, Some(0.5), 1.0));
        assert!(!dry.admits(None, Some(0.0), 1.0));

        let gentle = TerrainAdmissibility::MaxGrade {
            sea_level: 0.0,
            max_grade: 0.5,
        };
        assert!(gentle.admits(Some(1.0), Some(1.4), 1.0));
        assert!(!gentle.admits(Some(1.0), Some(2.0), 1.0));
        assert!(gentle.admits(None, Some(2.0), 1.0));
    }

    #[test]
    fn test_world_config_from_json() {
        let json = r#"{
            "terrain": { "sample_count": 100 },
            "network": {
                "iterations": 50,
                "intersection_policy": "reject",
                "admissibility": { "policy": "above_sea_level", "sea_level": 0.5 }
            },
            "grid": { "width": 4, "height": 3 }
        }"#;
        let config: WorldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.terrain.sample_count, 100);
        assert_eq!(config.network.iterations, 50);
        assert_eq!(config.network.intersection_policy, IntersectionPolicy::Reject);
        assert_eq!(
            config.network.admissibility,
            TerrainAdmissibility::AboveSeaLevel { sea_level: 0.5 }
        );
        assert_eq!(config.grid, Some(GridSize { width: 4, height: 3 }));
        assert_eq!(config.network.branch_length, 1.0);
    }
}
