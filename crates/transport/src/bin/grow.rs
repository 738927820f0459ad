//! Generates a terrain and grows a road network over it.
//!
//! Run with:
//! ```
//! WORLD_CONFIG=world.json WORLD_OUTPUT=world-out.json cargo run -p transport --bin grow
//! ```
//!
//! Without `WORLD_CONFIG` the default world is used; without `WORLD_OUTPUT`
//! the snapshot is written to stdout.

use anyhow::Context;
use terrain::Terrain;
use tracing_subscriber::EnvFilter;
use transport::{TransportNetwork, WorldConfig, WorldSnapshot};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("WORLD_CONFIG") {
        Ok(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading world config {path}"))?;
            serde_json::from_str::<WorldConfig>(&contents)
                .with_context(|| format!("parsing world config {path}"))?
        }
        Err(_) => {
            tracing::info!("WORLD_CONFIG not set, using the default world");
            WorldConfig::default()
        }
    };

    let terrain = Terrain::build(config.terrain.clone())?;
    tracing::info!("Built terrain with {} samples", terrain.sample_count());

    let network = TransportNetwork::grow(config.network.clone(), Some(&terrain))?;

    let mut snapshot = WorldSnapshot::capture(&network, Some(&terrain));
    if let Some(size) = config.grid {
        let grid = terrain.elevation_grid(size.width, size.height);
        match grid.min_max() {
            Some((low, high)) => tracing::info!(
                "Elevation grid {}x{} spans {low:.2} to {high:.2}",
                grid.width(),
                grid.height()
            ),
            None => tracing::info!(
                "Elevation grid {}x{} has no data",
                grid.width(),
                grid.height()
            ),
        }
        snapshot = snapshot.with_grid(grid);
    }

    // Summary output
    let stats = network.stats();
    tracing::info!("Growth completed!");
    tracing::info!("  Nodes: {}", network.node_count());
    tracing::info!("  Segments: {}", network.segment_count());
    tracing::info!("  Highways: {}", network.highway_count());
    tracing::info!("  Junctions: {}", stats.junctions);
    tracing::info!("  Rejected: {}", stats.rejected());

    let json = snapshot.to_json()?;
    match std::env::var("WORLD_OUTPUT") {
        Ok(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing snapshot {path}"))?;
            tracing::info!("Wrote snapshot to {path}");
        }
        Err(_) => println!("{json}"),
    }

    Ok(())
}
