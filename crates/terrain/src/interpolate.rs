//! Spatial index and inverse-distance interpolation over scattered samples.

use geo::{Area, ConvexHull, Intersects, MultiPoint, Point, Polygon};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::site::{Bounds, Site};

/// Distance under which a query is treated as sitting exactly on a sample.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Hull area at or below which the sample set is considered degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

type IndexedSample = GeomWithData<[f64; 2], usize>;

/// Region in which interpolated elevations are defined.
#[derive(Debug, Clone)]
pub(crate) enum Domain {
    /// Convex hull of the samples.
    Hull(Polygon<f64>),
    /// Fewer than three samples, or all collinear: the whole bounds rectangle.
    Bounds,
}

impl Domain {
    pub(crate) fn from_sites(sites: &[Site]) -> Self {
        if sites.len() < 3 {
            return Domain::Bounds;
        }
        let points: MultiPoint<f64> = sites.iter().map(|s| Point::from(*s)).collect();
        let hull = points.convex_hull();
        if hull.unsigned_area() <= DEGENERATE_AREA {
            Domain::Bounds
        } else {
            Domain::Hull(hull)
        }
    }

    /// Boundary points count as inside.
    pub(crate) fn contains(&self, site: &Site) -> bool {
        match self {
            Domain::Hull(hull) => hull.intersects(&Point::from(*site)),
            Domain::Bounds => true,
        }
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        matches!(self, Domain::Bounds)
    }
}

/// R-tree over sample positions plus the blending parameters.
#[derive(Debug, Clone)]
pub(crate) struct Interpolator {
    tree: RTree<IndexedSample>,
    domain: Domain,
    bounds: Bounds,
    neighbors: usize,
    power: f64,
}

impl Interpolator {
    pub(crate) fn new(bounds: Bounds, sites: &[Site], neighbors: usize, power: f64) -> Self {
        let entries = sites
            .iter()
            .enumerate()
            .map(|(i, s)| GeomWithData::new([s.x, s.y], i))
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            domain: Domain::from_sites(sites),
            bounds,
            neighbors,
            power,
        }
    }

    pub(crate) fn domain(&self) -> &Domain {
        &self.domain
    }

    pub(crate) fn contains(&self, site: &Site) -> bool {
        self.bounds.contains(site) && self.domain.contains(site)
    }

    /// Blends the elevations of the nearest samples, or `None` outside the domain.
    pub(crate) fn interpolate(&self, site: &Site, elevations: &[f64]) -> Option<f64> {
        if !site.is_finite() || !self.contains(site) {
            return None;
        }

        let query = [site.x, site.y];
        let mut nearest = self
            .tree
            .nearest_neighbor_iter(&query)
            .take(self.neighbors)
            .map(|entry| (Site::from(*entry.geom()).distance(site), entry.data));

        let (closest, first) = nearest.next()?;
        if closest < COINCIDENT_EPSILON {
            return Some(elevations[first]);
        }

        // Weights are taken relative to the closest sample, so they stay in (0, 1].
        let mut weighted = elevations[first];
        let mut total_weight = 1.0;
        for (distance, index) in nearest {
            let weight = (closest / distance).powf(self.power);
            weighted += weight * elevations[index];
            total_weight += weight;
        }

        Some(weighted / total_weight)
    }
}
