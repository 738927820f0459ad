//! Priority-driven growth of the road network.
//!
//! Every pending segment is a [`GrowthCandidate`] in a max-priority queue. Each
//! step pops one, proposes an endpoint (straight with jitter, or rotated toward
//! the cheapest heading), checks it against the bounds and the terrain, snaps
//! it to nearby nodes or crossing segments, and finally records it as
//! accepted, merged or rejected. Accepted segments queue their own follow-ups.

use std::f64::consts::{FRAC_PI_2, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use terrain::{Bounds, Site, Terrain};
use tracing::{debug, trace};

use crate::candidate::{CandidateQueue, GrowthCandidate};
use crate::config::{IntersectionPolicy, NetworkConfig, RoadClass};
use crate::error::NetworkError;
use crate::geometry::{Crossing, angle_between, segment_crossing};
use crate::graph::{NetworkGraph, NodeId};
use crate::index::SpatialIndex;
use crate::network::TransportNetwork;

/// Upper bound on headings examined on each side of a rotation fan.
const MAX_FAN_STEPS: usize = 64;

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The endpoint left the bounds.
    OutOfBounds,
    /// The terrain has no elevation at the endpoint.
    NoTerrainData,
    /// The admissibility policy refused the endpoint.
    Inadmissible,
    /// The segment already exists.
    Duplicate,
    /// A crossing under [`IntersectionPolicy::Reject`], or a collinear overlap.
    Crossing,
    /// A junction would sit too close to an unrelated node.
    Crowded,
}

/// Outcome of resolving one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// A new node and segment were added; follow-up candidates were queued.
    Accepted { from: NodeId, node: NodeId },
    /// The segment ended on an existing node or a crossing junction.
    Merged {
        from: NodeId,
        node: NodeId,
        junction: bool,
    },
    Rejected(Rejection),
}

/// Counters collected while growing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub resolved: usize,
    pub accepted: usize,
    pub merged: usize,
    pub junctions: usize,
    pub split_segments: usize,
    pub rejected_out_of_bounds: usize,
    pub rejected_no_terrain_data: usize,
    pub rejected_inadmissible: usize,
    pub rejected_duplicate: usize,
    pub rejected_crossing: usize,
    pub rejected_crowded: usize,
}

impl GrowthStats {
    fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Accepted { .. } => self.accepted += 1,
            Resolution::Merged { junction, .. } => {
                self.merged += 1;
                if *junction {
                    self.junctions += 1;
                }
            }
            Resolution::Rejected(reason) => match reason {
                Rejection::OutOfBounds => self.rejected_out_of_bounds += 1,
                Rejection::NoTerrainData => self.rejected_no_terrain_data += 1,
                Rejection::Inadmissible => self.rejected_inadmissible += 1,
                Rejection::Duplicate => self.rejected_duplicate += 1,
                Rejection::Crossing => self.rejected_crossing += 1,
                Rejection::Crowded => self.rejected_crowded += 1,
            },
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_out_of_bounds
            + self.rejected_no_terrain_data
            + self.rejected_inadmissible
            + self.rejected_duplicate
            + self.rejected_crossing
            + self.rejected_crowded
    }
}

/// A candidate after its endpoint has been proposed and checked against the terrain.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    candidate: GrowthCandidate,
    parent_site: Site,
    parent_elevation: Option<f64>,
    heading: f64,
    step: f64,
    end: Site,
}

/// Nearest segment met by a proposal.
enum Obstacle {
    At { segment: usize, point: Site },
    Overlap,
}

/// Stepwise network growth over an optional terrain.
pub struct GrowthEngine<'a> {
    config: NetworkConfig,
    bounds: Bounds,
    terrain: Option<&'a Terrain>,
    rng: StdRng,
    jitter: Option<Normal<f64>>,
    tolerance: f64,
    queue: CandidateQueue,
    graph: NetworkGraph,
    index: SpatialIndex,
    stats: GrowthStats,
}

impl<'a> GrowthEngine<'a> {
    /// Validates `config`, places the start node and queues the two opening highways.
    pub fn new(config: NetworkConfig, terrain: Option<&'a Terrain>) -> Result<Self, NetworkError> {
        let bounds = config.validate(terrain.map(Terrain::bounds))?;

        let jitter = if config.branch_angle_deviation > 0.0 {
            let normal = Normal::new(0.0, config.branch_angle_deviation / 2.0)
                .map_err(|e| NetworkError::Configuration(e.to_string()))?;
            Some(normal)
        } else {
            None
        };

        let mut engine = Self {
            tolerance: config.snap_tolerance(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            bounds,
            terrain,
            jitter,
            queue: CandidateQueue::new(),
            graph: NetworkGraph::new(),
            index: SpatialIndex::new(),
            stats: GrowthStats::default(),
        };

        let start = engine.add_node(engine.config.start);
        let heading = engine.rng.gen_range(0.0..PI);
        engine
            .queue
            .push(&engine.config, start, heading, RoadClass::Highway, 0.0);
        engine
            .queue
            .push(&engine.config, start, heading + PI, RoadClass::Highway, 0.0);

        debug!(
            "Growing network from ({:.3}, {:.3}), budget {}, snap tolerance {:.3}",
            engine.config.start.x, engine.config.start.y, engine.config.iterations, engine.tolerance
        );

        Ok(engine)
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn stats(&self) -> &GrowthStats {
        &self.stats
    }

    /// Candidates still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Candidates resolved so far.
    pub fn resolved(&self) -> usize {
        self.stats.resolved
    }

    /// Resolves the next candidate. `None` once the budget is spent or the queue is empty.
    pub fn step(&mut self) -> Option<Resolution> {
        if self.stats.resolved >= self.config.iterations {
            return None;
        }
        let candidate = self.queue.pop()?;
        self.stats.resolved += 1;

        let resolution = self.resolve(candidate);
        self.stats.record(&resolution);
        trace!(
            "Candidate {} from node {}: {:?}",
            candidate.sequence, candidate.parent, resolution
        );
        Some(resolution)
    }

    /// Runs to completion and freezes the graph.
    pub fn finish(mut self) -> TransportNetwork {
        while self.step().is_some() {}
        TransportNetwork::new(self.graph, self.bounds, self.stats)
    }

    fn resolve(&mut self, candidate: GrowthCandidate) -> Resolution {
        let proposal = match self.propose(candidate) {
            Ok(proposal) => proposal,
            Err(rejection) => return Resolution::Rejected(rejection),
        };

        let parent = candidate.parent;
        let merge_target = self
            .index
            .nearest_node_within(proposal.end, self.tolerance, &[parent]);
        let end = match merge_target {
            Some(node) => self.graph.sites()[node],
            None => proposal.end,
        };

        match self.first_obstacle(parent, proposal.parent_site, end, merge_target) {
            Some(Obstacle::Overlap) => Resolution::Rejected(Rejection::Crossing),
            Some(Obstacle::At { segment, point }) => match self.config.intersection_policy {
                IntersectionPolicy::Reject => Resolution::Rejected(Rejection::Crossing),
                IntersectionPolicy::Snap => self.join_at_crossing(&proposal, segment, point),
            },
            None => match merge_target {
                Some(node) => self.connect(&proposal, node, false),
                None => self.extend(&proposal),
            },
        }
    }

    /// Picks a heading and endpoint, then applies the bounds and terrain checks.
    fn propose(&mut self, candidate: GrowthCandidate) -> Result<Proposal, Rejection> {
        let parent_site = self.graph.sites()[candidate.parent];
        let parent_elevation = self.terrain.and_then(|t| t.elevation_at(parent_site));
        let step = self.config.step_length(candidate.class);

        let heading = if self
            .rng
            .gen_bool(self.config.rotation_probability(candidate.class))
        {
            self.rotate(candidate.heading, parent_site, parent_elevation, step)
        } else {
            let deviation = self.config.branch_angle_deviation;
            match self.jitter.as_ref() {
                Some(normal) => {
                    let offset: f64 = normal.sample(&mut self.rng);
                    candidate.heading + offset.clamp(-deviation, deviation)
                }
                None => candidate.heading,
            }
        };

        let end = parent_site.step(heading, step);
        if !self.bounds.contains(&end) {
            return Err(Rejection::OutOfBounds);
        }
        if let Some(terrain) = self.terrain {
            let elevation = terrain.elevation_at(end);
            if elevation.is_none() {
                return Err(Rejection::NoTerrainData);
            }
            if !self.config.admissibility.admits(parent_elevation, elevation, step) {
                return Err(Rejection::Inadmissible);
            }
        }

        Ok(Proposal {
            candidate,
            parent_site,
            parent_elevation,
            heading,
            step,
            end,
        })
    }

    /// Lowest-cost heading in the fan around `heading`; straight wins ties.
    fn rotate(&self, heading: f64, parent: Site, parent_elevation: Option<f64>, step: f64) -> f64 {
        let deviation = self.config.branch_angle_deviation;
        let max_angle = self.config.branch_max_angle;
        let (steps, increment) = if deviation > 0.0 {
            let steps = (max_angle / deviation).floor() as usize;
            if steps > MAX_FAN_STEPS {
                (MAX_FAN_STEPS, max_angle / MAX_FAN_STEPS as f64)
            } else {
                (steps, deviation)
            }
        } else {
            (0, 0.0)
        };

        let mut best: Option<(f64, f64)> = None;
        for k in 0..=steps {
            for sign in [1.0, -1.0] {
                if k == 0 && sign < 0.0 {
                    continue;
                }
                let candidate = heading + sign * k as f64 * increment;
                let Some(score) = self.heading_cost(candidate, parent, parent_elevation, step)
                else {
                    continue;
                };
                if best.is_none_or(|(lowest, _)| score < lowest) {
                    best = Some((score, candidate));
                }
            }
        }

        best.map_or(heading, |(_, h)| h)
    }

    /// Grade plus pull toward the target; `None` for unusable headings.
    fn heading_cost(
        &self,
        heading: f64,
        parent: Site,
        parent_elevation: Option<f64>,
        step: f64,
    ) -> Option<f64> {
        let end = parent.step(heading, step);
        if !self.bounds.contains(&end) {
            return None;
        }

        let mut cost = 0.0;
        if let Some(terrain) = self.terrain {
            let elevation = terrain.elevation_at(end);
            if !self.config.admissibility.admits(parent_elevation, elevation, step) {
                return None;
            }
            if let (Some(from), Some(to)) = (parent_elevation, elevation) {
                cost += (to - from).abs() / step;
            }
        }
        if let Some(target) = self.config.target {
            let off_target = angle_between(heading, parent.heading_to(&target));
            cost += self.config.target_pull * (1.0 - off_target.cos());
        }
        Some(cost)
    }

    /// Segment met closest to the parent along `from → to`.
    ///
    /// Segments touching the parent or the merge target are ignored.
    fn first_obstacle(
        &self,
        parent: NodeId,
        from: Site,
        to: Site,
        merge_target: Option<NodeId>,
    ) -> Option<Obstacle> {
        let sites = self.graph.sites();
        let mut nearest: Option<(f64, usize, Site)> = None;

        for id in self.index.segments_near(from, to) {
            let segment = self.graph.segment(id);
            if segment.touches(parent) || merge_target.is_some_and(|m| segment.touches(m)) {
                continue;
            }
            match segment_crossing(from, to, sites[segment.a], sites[segment.b]) {
                None => {}
                Some(Crossing::Overlap) => return Some(Obstacle::Overlap),
                Some(Crossing::Point(point)) => {
                    let distance = from.distance_squared(&point);
                    if nearest.is_none_or(|(closest, _, _)| distance < closest) {
                        nearest = Some((distance, id, point));
                    }
                }
            }
        }

        nearest.map(|(_, segment, point)| Obstacle::At { segment, point })
    }

    /// Ends the proposal on the crossed segment, reusing its endpoint when close enough.
    fn join_at_crossing(
        &mut self,
        proposal: &Proposal,
        segment_id: usize,
        point: Site,
    ) -> Resolution {
        let segment = self.graph.segment(segment_id);
        let sites = self.graph.sites();
        let to_a = point.distance(&sites[segment.a]);
        let to_b = point.distance(&sites[segment.b]);

        let closest_end = if to_a <= to_b {
            (segment.a, to_a)
        } else {
            (segment.b, to_b)
        };
        if closest_end.1 < self.tolerance {
            return self.connect(proposal, closest_end.0, true);
        }

        if self
            .index
            .nearest_node_within(point, self.tolerance, &[])
            .is_some()
        {
            return Resolution::Rejected(Rejection::Crowded);
        }
        if let Some(terrain) = self.terrain {
            let elevation = terrain.elevation_at(point);
            if elevation.is_none() {
                return Resolution::Rejected(Rejection::NoTerrainData);
            }
            let run = proposal.parent_site.distance(&point);
            if !self
                .config
                .admissibility
                .admits(proposal.parent_elevation, elevation, run)
            {
                return Resolution::Rejected(Rejection::Inadmissible);
            }
        }

        let junction = self.add_node(point);
        self.split_segment(segment_id, junction);
        self.connect(proposal, junction, true)
    }

    /// Joins the parent to an existing node.
    fn connect(&mut self, proposal: &Proposal, node: NodeId, junction: bool) -> Resolution {
        let from = proposal.candidate.parent;
        if self.graph.has_segment(from, node) {
            return Resolution::Rejected(Rejection::Duplicate);
        }
        self.add_segment(from, node, proposal.candidate.class.is_highway());
        Resolution::Merged {
            from,
            node,
            junction,
        }
    }

    /// Places a fresh node and queues its continuation and side branches.
    fn extend(&mut self, proposal: &Proposal) -> Resolution {
        let candidate = proposal.candidate;
        let node = self.add_node(proposal.end);
        self.add_segment(candidate.parent, node, candidate.class.is_highway());

        let accumulated = candidate.accumulated_length + proposal.step;
        self.queue.push(
            &self.config,
            node,
            proposal.heading,
            candidate.class,
            accumulated,
        );
        for side in [FRAC_PI_2, -FRAC_PI_2] {
            if self.rng.gen_bool(self.config.branch_probability) {
                self.queue.push(
                    &self.config,
                    node,
                    proposal.heading + side,
                    RoadClass::Local,
                    accumulated,
                );
            }
        }

        Resolution::Accepted {
            from: candidate.parent,
            node,
        }
    }

    fn add_node(&mut self, site: Site) -> NodeId {
        let id = self.graph.add_node(site);
        self.index.insert_node(id, site);
        id
    }

    fn add_segment(&mut self, a: NodeId, b: NodeId, is_highway: bool) {
        if let Some(id) = self.graph.add_segment(a, b, is_highway) {
            let sites = self.graph.sites();
            self.index.insert_segment(id, sites[a], sites[b]);
        }
    }

    fn split_segment(&mut self, segment_id: usize, via: NodeId) {
        let original = self.graph.segment(segment_id);
        let (a, b, mid) = {
            let sites = self.graph.sites();
            (sites[original.a], sites[original.b], sites[via])
        };

        self.index.remove_segment(segment_id, a, b);
        let tail = self.graph.split_segment(segment_id, via);
        self.index.insert_segment(segment_id, a, mid);
        self.index.insert_segment(tail, mid, b);
        self.stats.split_segments += 1;
    }
}
