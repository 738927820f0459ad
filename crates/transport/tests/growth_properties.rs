//! End-to-end properties of terrain-backed network growth.

use std::collections::HashSet;

use transport::prelude::*;
use transport::{GrowthStats, Segment};

fn terrain() -> Terrain {
    let bounds = Bounds::new(80.0, 80.0);
    Terrain::build(TerrainConfig::new(bounds, 11).with_sample_count(3_000)).unwrap()
}

fn config(iterations: usize, seed: u64) -> NetworkConfig {
    NetworkConfig::new(Site::new(40.0, 40.0), iterations, seed).with_branch_probability(0.5)
}

fn pair(segment: &Segment) -> (NodeId, NodeId) {
    (segment.a.min(segment.b), segment.a.max(segment.b))
}

#[test]
fn test_growth_is_deterministic() {
    let terrain = terrain();
    let first = TransportNetwork::grow(config(800, 3), Some(&terrain)).unwrap();
    let second = TransportNetwork::grow(config(800, 3), Some(&terrain)).unwrap();

    assert_eq!(first.sites(), second.sites());
    assert_eq!(first.segments(), second.segments());
    assert_eq!(first.stats(), second.stats());
}

#[test]
fn test_seeds_change_the_network() {
    let terrain = terrain();
    let first = TransportNetwork::grow(config(300, 1), Some(&terrain)).unwrap();
    let second = TransportNetwork::grow(config(300, 2), Some(&terrain)).unwrap();
    assert_ne!(first.sites(), second.sites());
}

#[test]
fn test_nodes_stay_on_terrain() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(1_500, 5), Some(&terrain)).unwrap();

    assert!(network.node_count() > 1);
    for site in network.sites() {
        assert!(terrain.bounds().contains(site));
        assert!(terrain.elevation_at(*site).is_some(), "no data at {site:?}");
    }
}

#[test]
fn test_no_duplicate_segments() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(2_000, 8), Some(&terrain)).unwrap();

    let mut seen = HashSet::new();
    for segment in network.segments() {
        assert_ne!(segment.a, segment.b);
        assert!(seen.insert(pair(segment)), "duplicate {segment:?}");
    }
}

#[test]
fn test_nodes_respect_snap_tolerance() {
    let terrain = terrain();
    let config = config(1_500, 13);
    let tolerance = config.snap_tolerance();
    let network = TransportNetwork::grow(config, Some(&terrain)).unwrap();

    let sites = network.sites();
    for (i, a) in sites.iter().enumerate() {
        for b in &sites[i + 1..] {
            assert!(
                a.distance(b) >= tolerance,
                "{a:?} and {b:?} closer than {tolerance}"
            );
        }
    }
}

#[test]
fn test_neighbors_are_symmetric() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(1_000, 21), Some(&terrain)).unwrap();

    for segment in network.segments() {
        let forward = network.neighbors_of(segment.a).unwrap();
        let backward = network.neighbors_of(segment.b).unwrap();
        assert!(forward.contains(&Neighbor {
            id: segment.b,
            is_highway: segment.is_highway,
        }));
        assert!(backward.contains(&Neighbor {
            id: segment.a,
            is_highway: segment.is_highway,
        }));
    }

    let degree_sum: usize = (0..network.node_count())
        .map(|id| network.neighbors_of(id).unwrap().len())
        .sum();
    assert_eq!(degree_sum, 2 * network.segment_count());
}

#[test]
fn test_zero_budget_is_start_only() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(0, 4), Some(&terrain)).unwrap();

    assert_eq!(network.node_count(), 1);
    assert_eq!(network.segment_count(), 0);
    assert_eq!(network.site_of(0).unwrap(), Site::new(40.0, 40.0));
    assert!(network.neighbors_of(0).unwrap().is_empty());
    assert_eq!(*network.stats(), GrowthStats::default());
}

#[test]
fn test_smaller_budget_is_a_prefix() {
    let terrain = terrain();
    let reject = |iterations| {
        config(iterations, 17).with_intersection_policy(IntersectionPolicy::Reject)
    };
    let short = TransportNetwork::grow(reject(150), Some(&terrain)).unwrap();
    let long = TransportNetwork::grow(reject(900), Some(&terrain)).unwrap();

    assert!(short.node_count() <= long.node_count());
    assert_eq!(short.sites(), &long.sites()[..short.node_count()]);

    let long_pairs: HashSet<_> = long.segments().iter().map(pair).collect();
    assert!(short.segments().iter().all(|s| long_pairs.contains(&pair(s))));
}

#[test]
fn test_node_sequence_is_a_prefix_with_junctions() {
    let terrain = terrain();
    let short = TransportNetwork::grow(config(200, 17), Some(&terrain)).unwrap();
    let long = TransportNetwork::grow(config(1_200, 17), Some(&terrain)).unwrap();
    assert_eq!(short.sites(), &long.sites()[..short.node_count()]);
}

#[test]
fn test_invalid_index() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(100, 6), Some(&terrain)).unwrap();
    let count = network.node_count();

    assert_eq!(
        network.site_of(count),
        Err(NetworkError::InvalidIndex { index: count, count })
    );
    assert!(matches!(
        network.neighbors_of(count + 10),
        Err(NetworkError::InvalidIndex { .. })
    ));
}

#[test]
fn test_highways_lead_growth() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(1_000, 9), Some(&terrain)).unwrap();

    assert!(network.highway_count() > 0);
    assert!(network.highway_count() < network.segment_count());
    // The opening segments are highways.
    assert!(network.neighbors_of(0).unwrap().iter().any(|n| n.is_highway));
}

#[test]
fn test_stats_account_for_every_candidate() {
    let terrain = terrain();
    let network = TransportNetwork::grow(config(700, 12), Some(&terrain)).unwrap();
    let stats = network.stats();

    assert!(stats.resolved <= 700);
    assert_eq!(stats.accepted + stats.merged + stats.rejected(), stats.resolved);
    assert_eq!(network.node_count(), 1 + stats.accepted + stats.split_segments);
    assert_eq!(
        network.segment_count(),
        stats.accepted + stats.merged + stats.split_segments
    );
}

#[test]
fn test_snap_policy_creates_junctions() {
    let config = NetworkConfig::new(Site::new(50.0, 50.0), 3_000, 2)
        .with_bounds(Bounds::new(100.0, 100.0))
        .with_branch_probability(0.6)
        .with_rotation_probabilities(0.5, 0.1);
    let network = TransportNetwork::grow(config, None).unwrap();

    assert!(network.stats().junctions > 0);
    assert!(network.stats().merged > 0);
}

#[test]
fn test_reject_policy_never_splits() {
    let config = NetworkConfig::new(Site::new(50.0, 50.0), 3_000, 2)
        .with_bounds(Bounds::new(100.0, 100.0))
        .with_branch_probability(0.6)
        .with_intersection_policy(IntersectionPolicy::Reject);
    let network = TransportNetwork::grow(config, None).unwrap();

    assert_eq!(network.stats().split_segments, 0);
    assert_eq!(network.stats().junctions, 0);
    assert!(network.stats().rejected_crossing > 0);
}

#[test]
fn test_grows_without_terrain() {
    let bounds = Bounds::new(30.0, 20.0);
    let config = NetworkConfig::new(Site::new(15.0, 10.0), 500, 0).with_bounds(bounds);
    let network = TransportNetwork::grow(config, None).unwrap();

    assert!(network.node_count() > 10);
    assert!(network.sites().iter().all(|s| bounds.contains(s)));
    assert_eq!(network.bounds(), bounds);
}

#[test]
fn test_dry_land_keeps_roads_above_sea_level() {
    let terrain = terrain();
    let config = config(1_000, 31).with_admissibility(TerrainAdmissibility::dry_land());
    let network = TransportNetwork::grow(config, Some(&terrain)).unwrap();

    for site in &network.sites()[1..] {
        let elevation = terrain.elevation_at(*site).unwrap();
        assert!(elevation >= 1e-3, "road below sea level at {site:?}");
    }
}

#[test]
fn test_stepwise_matches_grow() {
    let terrain = terrain();
    let mut engine = GrowthEngine::new(config(400, 14), Some(&terrain)).unwrap();
    let mut steps = 0;
    while engine.step().is_some() {
        steps += 1;
    }
    assert_eq!(engine.resolved(), steps);

    let stepped = engine.finish();
    let grown = TransportNetwork::grow(config(400, 14), Some(&terrain)).unwrap();
    assert_eq!(stepped, grown);
}
