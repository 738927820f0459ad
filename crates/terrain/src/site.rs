//! Planar point and rectangle value types shared by the terrain and the road network.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    pub x: f64,
    pub y: f64,
}

impl Site {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another site.
    pub fn distance_squared(&self, other: &Site) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another site, without overflow for large coordinates.
    pub fn distance(&self, other: &Site) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves `length` along `heading` (radians, counter-clockwise from +x).
    pub fn step(&self, heading: f64, length: f64) -> Site {
        Site {
            x: self.x + length * heading.cos(),
            y: self.y + length * heading.sin(),
        }
    }

    /// Heading from this site toward `other`.
    pub fn heading_to(&self, other: &Site) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Site {
    fn from(p: [f64; 2]) -> Self {
        Site { x: p[0], y: p[1] }
    }
}

impl From<Site> for [f64; 2] {
    fn from(site: Site) -> Self {
        [site.x, site.y]
    }
}

impl From<geo::Coord<f64>> for Site {
    fn from(c: geo::Coord<f64>) -> Self {
        Site { x: c.x, y: c.y }
    }
}

impl From<Site> for geo::Coord<f64> {
    fn from(site: Site) -> Self {
        geo::coord! { x: site.x, y: site.y }
    }
}

impl From<Site> for geo::Point<f64> {
    fn from(site: Site) -> Self {
        geo::Point::new(site.x, site.y)
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Site,
    pub max: Site,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

impl Bounds {
    /// Rectangle `[0, max_x] × [0, max_y]`.
    pub const fn new(max_x: f64, max_y: f64) -> Self {
        Self {
            min: Site::new(0.0, 0.0),
            max: Site::new(max_x, max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Site {
        Site::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, site: &Site) -> bool {
        site.x >= self.min.x && site.x <= self.max.x && site.y >= self.min.y && site.y <= self.max.y
    }

    /// Checks both extents are finite and strictly positive.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let (width, height) = (self.width(), self.height());
        if !self.min.is_finite() || !width.is_finite() || !height.is_finite() {
            return Err(TerrainError::InvalidBounds { width, height });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(TerrainError::InvalidBounds { width, height });
        }
        Ok(())
    }

    /// Returns a uniformly distributed point inside the rectangle.
    pub fn random_site(&self, rng: &mut impl rand::Rng) -> Site {
        let x = rng.gen_range(self.min.x..self.max.x);
        let y = rng.gen_range(self.min.y..self.max.y);
        Site { x, y }
    }
}
