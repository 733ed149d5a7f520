//! Late decoration of finished regions: landmark terrain and resources, the
//! Lost Isle's old settlement site and its river.

use crate::collab::ResourcePlacer;
use crate::grid::WorldGrid;
use crate::plot::{Resource, Terrain};
use crate::rivers::{Flow, RiverMaker};
use crate::rng::RandomSource;

use super::bog::{BIG_BOG_NAME, SMALL_BOG_NAME};
use super::{MapRegions, RegionKind};

const BIG_BOG_FISH_CHANCE: i32 = 33;
const DARKWATER_FISH_CHANCE: i32 = 20;
const LAKE_RESOURCES: [(u32, Resource); 2] = [(66, Resource::Fish), (100, Resource::Clam)];
const ISLE_RESOURCE_TRIES: usize = 4;
const SITE_SEA_RESOURCES: [Resource; 2] = [Resource::Fish, Resource::Crab];

/// Land resources tried on the Lost Isle; a group yields one of its members
const ISLE_RESOURCE_GROUPS: [&[Resource]; 8] = [
    &[Resource::Gold],
    &[Resource::Silver],
    &[Resource::Copper, Resource::Iron],
    &[Resource::Oil],
    &[Resource::Sheep, Resource::Cow],
    &[Resource::Coal],
    &[Resource::Sulphur],
    &[Resource::Uranium],
];

impl MapRegions {
    /// Decorate every region built so far: the Lost Isle first, then bogs,
    /// then dents.
    pub fn add_region_extras<R: RandomSource, P: ResourcePlacer>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        placer: &P,
    ) {
        if !self.lost_isles.is_empty() {
            self.add_lost_isle_extras(grid, rng, rivers, placer);
        }
        if !self.bogs.is_empty() {
            self.add_bog_extras(grid, rng, placer);
        }
        if !self.dents.is_empty() {
            self.add_dent_extras(grid, placer);
        }
    }

    fn add_lost_isle_extras<R: RandomSource, P: ResourcePlacer>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        placer: &P,
    ) {
        for i in 0..self.lost_isles.len() {
            let stamp = self.lost_isles[i].stamp.clone();

            let coastal: Vec<(usize, usize)> = stamp
                .iter()
                .copied()
                .filter(|&(x, y)| {
                    let p = grid.plot(x, y);
                    !p.is_peak() && !p.is_water() && grid.is_coastal_land(x, y)
                })
                .collect();
            let Some((cx, cy)) = rng.pick(&coastal) else {
                tracing::info!("no settlement site on the Lost Isle");
                continue;
            };
            self.lost_isles[i].site = Some((cx, cy));
            grid.set_resource(cx, cy, None);
            tracing::info!("old settlement on the Lost Isle at ({cx},{cy})");

            let dirs = grid.check_river_end(cx, cy, Flow::Down);
            match rng.pick(&dirs) {
                Some(dir) => {
                    if let Some(river) = rivers.build_river(grid, rng, cx, cy, Flow::Up, Some(dir)) {
                        self.rivers.push(river);
                    }
                }
                None => tracing::info!("no river on the Lost Isle"),
            }

            soften_isle_terrain(grid, rng, &stamp);

            let mut groups = ISLE_RESOURCE_GROUPS.to_vec();
            for _ in 0..ISLE_RESOURCE_TRIES {
                let Some(group) = rng.pop(&mut groups) else {
                    break;
                };
                let Some(resource) = rng.pick(group) else {
                    continue;
                };
                let mut spots: Vec<(usize, usize)> = stamp
                    .iter()
                    .copied()
                    .filter(|&(x, y)| (x, y) != (cx, cy))
                    .filter(|&(x, y)| {
                        let p = grid.plot(x, y);
                        !p.is_peak() && p.resource.is_none()
                    })
                    .filter(|&(x, y)| placer.is_valid(grid, resource, x, y))
                    .collect();
                if let Some((x, y)) = rng.pop(&mut spots) {
                    placer.place(grid, x, y, resource);
                    tracing::debug!("{resource:?} on the Lost Isle at ({x},{y})");
                }
            }

            let mut water = Vec::new();
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some((x, y)) = grid.plot_xy(cx as i32 + dx, cy as i32 + dy) {
                        if grid.plot(x, y).is_water() {
                            water.push((x, y));
                        }
                    }
                }
            }
            match (rng.pick(&water), rng.pick(&SITE_SEA_RESOURCES)) {
                (Some((x, y)), Some(resource)) => placer.place(grid, x, y, resource),
                _ => tracing::info!("no sea resource by the settlement"),
            }
        }
    }

    /// Fish or clams in bog lakes: the Big Bog, and the first small bog
    /// that has its lake.
    fn add_bog_extras<R: RandomSource, P: ResourcePlacer>(&mut self, grid: &mut WorldGrid, rng: &mut R, placer: &P) {
        let mut dark_lake = false;
        let bogs: Vec<(String, (usize, usize))> = self
            .records
            .iter()
            .filter(|r| r.kind == RegionKind::Bog)
            .map(|r| (r.name.clone(), r.name_plot))
            .collect();
        for (name, (x, y)) in bogs {
            if !grid.plot(x, y).is_water() {
                continue;
            }
            let chance = match name.as_str() {
                BIG_BOG_NAME => BIG_BOG_FISH_CHANCE,
                SMALL_BOG_NAME if !dark_lake => {
                    dark_lake = true;
                    DARKWATER_FISH_CHANCE
                }
                _ => continue,
            };
            if rng.choose(chance) {
                if let Some(resource) = rng.choose_more(&LAKE_RESOURCES) {
                    if placer.is_valid(grid, resource, x, y) {
                        placer.place(grid, x, y, resource);
                    }
                }
            }
        }
    }

    /// Apply each dent's landmark to its landmark plot.
    fn add_dent_extras<P: ResourcePlacer>(&mut self, grid: &mut WorldGrid, placer: &P) {
        for dent in &self.dents {
            let (x, y) = dent.name_plot;
            let mark = dent.landmark;
            let (flat, hills) = {
                let plot = grid.plot(x, y);
                (plot.is_flat(), plot.is_hills())
            };
            if flat {
                grid.set_terrain(x, y, mark.terrain);
                grid.set_feature(x, y, mark.feature);
                if let Some(resource) = mark.flat_resource {
                    if placer.is_valid(grid, resource, x, y) {
                        placer.place(grid, x, y, resource);
                    }
                }
            } else if hills {
                if let Some(resource) = mark.hills_resource {
                    if placer.is_valid(grid, resource, x, y) {
                        placer.place(grid, x, y, resource);
                    }
                }
            }
        }
    }
}

/// Warm up the isle's cold and dry plots; fresh water favours marsh and
/// grass.
fn soften_isle_terrain<R: RandomSource>(grid: &mut WorldGrid, rng: &mut R, stamp: &[(usize, usize)]) {
    for &(x, y) in stamp {
        let plot = grid.plot(x, y);
        if plot.is_peak() || plot.is_water() {
            continue;
        }
        let current = plot.terrain;
        let fresh = grid.is_fresh_water(x, y);
        let softened = match current {
            Terrain::Snow => {
                let t = rng
                    .choose_more(&[(20, Terrain::Grass), (85, Terrain::Tundra), (100, Terrain::Snow)])
                    .unwrap_or(current);
                if fresh {
                    rng.choose_more(&[(25, Terrain::Marsh), (75, t), (100, Terrain::Grass)])
                        .unwrap_or(t)
                } else {
                    t
                }
            }
            Terrain::Tundra if fresh => rng
                .choose_more(&[(30, Terrain::Grass), (60, Terrain::Marsh), (100, Terrain::Tundra)])
                .unwrap_or(current),
            Terrain::Tundra => rng
                .choose_more(&[(30, Terrain::Grass), (100, Terrain::Tundra)])
                .unwrap_or(current),
            Terrain::Desert => {
                let t = if rng.choose(20) { Terrain::Grass } else { Terrain::Plains };
                if !fresh && !grid.is_coastal_land(x, y) && rng.choose(25) {
                    Terrain::Desert
                } else {
                    t
                }
            }
            _ => continue,
        };
        grid.set_terrain(x, y, softened);
    }
}
