//! Planar helpers for headings and segment crossings.

use std::f64::consts::{PI, TAU};

use geo::Line;
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use terrain::Site;

/// How two segments meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// They share exactly one point.
    Point(Site),
    /// They overlap along a stretch.
    Overlap,
}

/// Intersection of segment `a0 → a1` with segment `b0 → b1`, if any.
pub fn segment_crossing(a0: Site, a1: Site, b0: Site, b1: Site) -> Option<Crossing> {
    match line_intersection(Line::new(a0, a1), Line::new(b0, b1))? {
        LineIntersection::SinglePoint { intersection, .. } => {
            Some(Crossing::Point(Site::from(intersection)))
        }
        LineIntersection::Collinear { .. } => Some(Crossing::Overlap),
    }
}

/// Wraps an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Unsigned difference between two headings, in `[0, π]`.
pub fn angle_between(a: f64, b: f64) -> f64 {
    normalize_angle(a - b).abs()
}

/// Axis-aligned envelope corners of a segment.
pub fn envelope(a: Site, b: Site) -> ([f64; 2], [f64; 2]) {
    ([a.x.min(b.x), a.y.min(b.y)], [a.x.max(b.x), a.y.max(b.y)])
}
