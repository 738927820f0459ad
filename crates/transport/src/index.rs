//! R-trees over road nodes and segments for proximity and crossing queries.

use rstar::primitives::{GeomWithData, Line};
use rstar::{AABB, RTree};
use terrain::Site;

use crate::geometry::envelope;
use crate::graph::NodeId;

type NodeEntry = GeomWithData<[f64; 2], NodeId>;
type SegmentEntry = GeomWithData<Line<[f64; 2]>, usize>;

#[derive(Debug, Default)]
pub(crate) struct SpatialIndex {
    nodes: RTree<NodeEntry>,
    segments: RTree<SegmentEntry>,
}

impl SpatialIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_node(&mut self, id: NodeId, site: Site) {
        self.nodes.insert(GeomWithData::new([site.x, site.y], id));
    }

    /// Closest node strictly within `tolerance` of `site`, skipping `exclude`.
    ///
    /// Equidistant nodes resolve to the lower id.
    pub(crate) fn nearest_node_within(
        &self,
        site: Site,
        tolerance: f64,
        exclude: &[NodeId],
    ) -> Option<NodeId> {
        let limit = tolerance * tolerance;
        self.nodes
            .locate_within_distance([site.x, site.y], limit)
            .filter(|entry| !exclude.contains(&entry.data))
            .map(|entry| (Site::from(*entry.geom()).distance_squared(&site), entry.data))
            .filter(|(d2, _)| *d2 < limit)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    pub(crate) fn insert_segment(&mut self, id: usize, a: Site, b: Site) {
        self.segments
            .insert(GeomWithData::new(Line::new([a.x, a.y], [b.x, b.y]), id));
    }

    pub(crate) fn remove_segment(&mut self, id: usize, a: Site, b: Site) -> bool {
        let entry = GeomWithData::new(Line::new([a.x, a.y], [b.x, b.y]), id);
        self.segments.remove(&entry).is_some()
    }

    /// Ids of segments whose envelopes meet the envelope of `a → b`, ascending.
    pub(crate) fn segments_near(&self, a: Site, b: Site) -> Vec<usize> {
        let (lower, upper) = envelope(a, b);
        let mut ids: Vec<usize> = self
            .segments
            .locate_in_envelope_intersecting(&AABB::from_corners(lower, upper))
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_node_within_tolerance() {
        let mut index = SpatialIndex::new();
        index.insert_node(0, Site::new(0.0, 0.0));
        index.insert_node(1, Site::new(1.0, 0.0));
        index.insert_node(2, Site::new(0.3, 0.0));

        assert_eq!(index.nearest_node_within(Site::new(0.25, 0.0), 0.5, &[]), Some(2));
        assert_eq!(index.nearest_node_within(Site::new(0.25, 0.0), 0.5, &[2]), Some(0));
        assert_eq!(index.nearest_node_within(Site::new(5.0, 5.0), 0.5, &[]), None);
        // Exactly at the tolerance does not count.
        assert_eq!(index.nearest_node_within(Site::new(1.5, 0.0), 0.5, &[]), None);
    }

    #[test]
    fn test_equidistant_nodes_prefer_lower_id() {
        let mut index = SpatialIndex::new();
        index.insert_node(4, Site::new(1.0, 0.0));
        index.insert_node(3, Site::new(-1.0, 0.0));
        assert_eq!(index.nearest_node_within(Site::new(0.0, 0.0), 2.0, &[]), Some(3));
    }

    #[test]
    fn test_segment_lookup_and_removal() {
        let mut index = SpatialIndex::new();
        let (a, b) = (Site::new(0.0, 0.0), Site::new(2.0, 0.0));
        let (c, d) = (Site::new(10.0, 10.0), Site::new(11.0, 11.0));
        index.insert_segment(0, a, b);
        index.insert_segment(1, c, d);

        assert_eq!(index.segments_near(Site::new(1.0, -1.0), Site::new(1.0, 1.0)), vec![0]);
        assert!(index.remove_segment(0, a, b));
        assert!(!index.remove_segment(0, a, b));
        assert!(index.segments_near(Site::new(1.0, -1.0), Site::new(1.0, 1.0)).is_empty());
    }
}
