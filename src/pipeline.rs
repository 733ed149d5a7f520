//! The driving sequence: regions first, then lake and island rivers, then
//! region extras.

use serde::{Deserialize, Serialize};

use crate::collab::{BasicResources, LatitudeTerrain, ResourcePlacer, TerrainGenerator};
use crate::config::SculptConfig;
use crate::grid::WorldGrid;
use crate::regions::{MapRegions, RegionRecord};
use crate::rivers::{River, RiverMaker};
use crate::rng::RandomSource;

/// What one sculpting run built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SculptReport {
    pub lost_isle: Option<(usize, usize)>,
    pub bogs: u32,
    pub dents: u32,
    /// Rivers grown by the region builders and extras
    pub region_rivers: usize,
    pub lake_rivers: usize,
    pub island_rivers: usize,
    /// River edges on the finished map
    pub river_edges: usize,
    pub records: Vec<RegionRecord>,
    pub rivers: Vec<River>,
}

/// Sculpt `grid` with the default terrain generator and resource rules.
pub fn sculpt_world<R: RandomSource>(grid: &mut WorldGrid, config: &SculptConfig, rng: &mut R) -> SculptReport {
    sculpt_world_with(grid, config, rng, &LatitudeTerrain::default(), &BasicResources)
}

pub fn sculpt_world_with<R: RandomSource, G: TerrainGenerator, P: ResourcePlacer>(
    grid: &mut WorldGrid,
    config: &SculptConfig,
    rng: &mut R,
    terrain: &G,
    placer: &P,
) -> SculptReport {
    let steps = &config.pipeline;
    let mut regions = MapRegions::new(config.regions.clone(), config.marsh.clone());
    let mut rivers = RiverMaker::new(config.rivers.clone());
    let mut report = SculptReport::default();

    if steps.lost_isle {
        let chance = regions.params.lost_isle_chance;
        let min_dist = regions.params.lost_isle_min_dist;
        report.lost_isle = regions.build_lost_isle(grid, rng, terrain, chance, min_dist, steps.aliens);
    }
    report.bogs = regions.build_bogs(grid, rng, &mut rivers, steps.bogs);
    report.dents = regions.build_dents(grid, rng, &mut rivers, steps.dents);

    let mut extra_rivers = Vec::new();
    if steps.lake_rivers {
        let built = rivers.build_rivers_from_lake(
            grid,
            rng,
            None,
            steps.lake_river_chance,
            steps.lake_river_count,
            steps.lake_min_tiles,
        );
        report.lake_rivers = built.len();
        extra_rivers.extend(built);
    }
    if steps.island_rivers {
        let built = rivers.island_rivers(grid, rng, steps.island_min_tiles, steps.island_max_tiles, None);
        report.island_rivers = built.len();
        extra_rivers.extend(built);
    }
    if steps.region_extras {
        regions.add_region_extras(grid, rng, &mut rivers, placer);
    }

    report.region_rivers = regions.rivers().len();
    report.rivers = regions.rivers().to_vec();
    report.rivers.extend(extra_rivers);
    report.records = regions.records().to_vec();
    report.river_edges = grid.river_edge_count();

    tracing::info!(
        "sculpted {} regions ({} bogs, {} dents, lost isle: {}), {} rivers, {} river edges",
        report.records.len(),
        report.bogs,
        report.dents,
        report.lost_isle.is_some(),
        report.rivers.len(),
        report.river_edges
    );
    report
}
