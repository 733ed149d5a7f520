//! Debug tool for the river generator
//! Grows lake and island rivers on a base map, logs every river and writes a
//! large-scale PNG so individual edges can be inspected.

use region_sculptor::basemap::{generate_base_map, BaseMapParams};
use region_sculptor::collab::LatitudeTerrain;
use region_sculptor::export::write_png;
use region_sculptor::logging::{init_tracing, LogLevel, LoggingConfig};
use region_sculptor::rivers::{river_summary, RiverMaker};
use region_sculptor::{seeded, Result, WorldGrid};

const WIDTH: usize = 60;
const HEIGHT: usize = 40;
const SEED: u64 = 42;
const SCALE: u32 = 12;

fn main() -> Result<()> {
    init_tracing(&LoggingConfig::with_level(LogLevel::Debug));

    let mut rng = seeded(SEED);
    let mut grid = WorldGrid::new(WIDTH, HEIGHT).with_wrap(true, false);
    generate_base_map(
        &mut grid,
        &mut rng,
        &LatitudeTerrain::default(),
        SEED as u32,
        &BaseMapParams::default(),
    );

    let mut maker = RiverMaker::default();
    let mut rivers = maker.build_rivers_from_lake(&mut grid, &mut rng, None, 100, 2, 1);
    rivers.extend(maker.island_rivers(&mut grid, &mut rng, 3, 200, None));

    for river in &rivers {
        tracing::info!("{}", river_summary(river));
    }
    tracing::info!("{} rivers, {} edges", rivers.len(), grid.river_edge_count());

    let path = "debug_rivers.png";
    write_png(&grid, path, SCALE)?;
    tracing::info!("wrote {path}");
    Ok(())
}
