//! The Lost Isle: a small island raised from empty ocean.

use crate::collab::TerrainGenerator;
use crate::grid::WorldGrid;
use crate::plot::{PlotKind, Resource, Terrain};
use crate::rng::RandomSource;

use super::template::{Template, LOST_ISLE};
use super::{LostIsleSite, MapRegions, RegionKind};

pub const LOST_ISLE_NAME: &str = "The Lost Isle";

/// Chance for a resource on each coast plot around the island
const COAST_RESOURCE_CHANCE: i32 = 16;
const COAST_RESOURCES: [Resource; 4] = [Resource::Clam, Resource::Crab, Resource::Fish, Resource::Shrimp];
/// Most land plots tolerated in the empty-ocean window
const HIGH_SEAS_THRESHOLD: usize = 2;

/// Plot kind table for a template symbol.
fn kind_table(symbol: u8) -> &'static [(u32, PlotKind)] {
    match symbol {
        0 => &[(10, PlotKind::Land), (100, PlotKind::Ocean)],
        1 => &[(20, PlotKind::Hills), (95, PlotKind::Land), (100, PlotKind::Ocean)],
        2 => &[(20, PlotKind::Land), (95, PlotKind::Hills), (100, PlotKind::Peak)],
        _ => &[(20, PlotKind::Land), (50, PlotKind::Hills), (100, PlotKind::Peak)],
    }
}

impl MapRegions {
    /// Raise the Lost Isle with `chance` percent. Needs open ocean within
    /// `min_dist` (one more for an alien isle) of the centre. Returns the
    /// centre.
    pub fn build_lost_isle<R: RandomSource, G: TerrainGenerator>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        terrain: &G,
        chance: u32,
        min_dist: i32,
        aliens: bool,
    ) -> Option<(usize, usize)> {
        if !rng.choose(chance as i32) {
            tracing::info!("no Lost Isle this time");
            return None;
        }
        grid.recalculate_areas();

        let dist = min_dist + aliens as i32;
        let Some((centre, stamp)) = self.create_lost_isle(grid, rng, terrain, dist) else {
            tracing::info!("unable to create the Lost Isle");
            return None;
        };
        let Some(&name_plot) = stamp.iter().max() else {
            tracing::info!("the Lost Isle sank: nothing rose above the sea");
            return None;
        };
        self.lost_isles.push(LostIsleSite {
            centre,
            stamp,
            aliens,
            site: None,
        });
        self.register(RegionKind::LostIsle, LOST_ISLE_NAME, centre, name_plot, false);
        Some(centre)
    }

    /// Pick an open-ocean centre and stamp a randomly turned isle there.
    fn create_lost_isle<R: RandomSource, G: TerrainGenerator>(
        &self,
        grid: &mut WorldGrid,
        rng: &mut R,
        terrain: &G,
        dist: i32,
    ) -> Option<((usize, usize), Vec<(usize, usize)>)> {
        let margin = self.params.isle_edge_margin;
        let mut candidates = Vec::new();
        for index in 0..grid.num_plots() {
            let (x, y) = grid.coord_of(index);
            if !grid.within_margin(x, y, margin) {
                continue;
            }
            if grid.is_high_seas(x, y, dist, true, HIGH_SEAS_THRESHOLD) && self.region_check(grid, x, y) {
                candidates.push((x, y));
            }
        }
        tracing::debug!("{} possible plots for the Lost Isle", candidates.len());

        let centre = rng.pick(&candidates)?;
        let template = Template::from_rows(&LOST_ISLE).rotate(rng.draw_int(4));
        let stamp = stamp_lost_isle(grid, rng, terrain, &template, centre);
        Some((centre, stamp))
    }
}

/// Stamp the template with its centre cell on `centre`, assign terrain and
/// features, turn the surrounding water to coast and refresh areas. Returns
/// the plots that became land.
pub fn stamp_lost_isle<R: RandomSource, G: TerrainGenerator>(
    grid: &mut WorldGrid,
    rng: &mut R,
    terrain: &G,
    template: &Template,
    centre: (usize, usize),
) -> Vec<(usize, usize)> {
    let (x0, y0) = (centre.0 as i32, centre.1 as i32);
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let mut stamp = Vec::new();

    for row in 0..template.rows() {
        for col in 0..template.cols() {
            let Some(symbol) = template.get(row, col) else {
                continue;
            };
            let fx = x0 - 2 + col as i32;
            let fy = y0 - 2 + row as i32;
            if !(0..w).contains(&fx) || !(0..h).contains(&fy) {
                continue;
            }
            let (x, y) = (fx as usize, fy as usize);
            let kind = rng.choose_more(kind_table(symbol)).unwrap_or(PlotKind::Ocean);
            grid.set_plot_kind(x, y, kind);
            let t = terrain.terrain_for(grid, x, y);
            grid.set_terrain(x, y, t);
            let feature = terrain.features_at(grid, x, y, rng);
            grid.set_feature(x, y, feature);
            if kind != PlotKind::Ocean {
                stamp.push((x, y));
            }
        }
    }

    for &(x, y) in &stamp {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some((cx, cy)) = grid.plot_xy(x as i32 + dx, y as i32 + dy) else {
                    continue;
                };
                if !grid.plot(cx, cy).is_water() {
                    continue;
                }
                grid.set_terrain(cx, cy, Terrain::Coast);
                if rng.choose(COAST_RESOURCE_CHANCE) {
                    let resource = rng.pick(&COAST_RESOURCES);
                    grid.set_resource(cx, cy, resource);
                }
            }
        }
    }

    grid.recalculate_areas();
    tracing::debug!("Lost Isle stamped with {} land plots", stamp.len());
    stamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::LatitudeTerrain;
    use crate::rng::seeded;

    fn ocean(w: usize, h: usize) -> WorldGrid {
        WorldGrid::new(w, h)
    }

    #[test]
    fn test_stamp_raises_land_and_coast() {
        let mut grid = ocean(20, 20);
        let template = Template::from_rows(&LOST_ISLE);
        let stamp = stamp_lost_isle(&mut grid, &mut seeded(1), &LatitudeTerrain::default(), &template, (10, 10));
        assert!(stamp.len() >= 8);
        for &(x, y) in &stamp {
            assert!(!grid.plot(x, y).is_water());
            assert!((8..=12).contains(&x) && (8..=12).contains(&y));
        }
        assert!(grid
            .iter()
            .any(|(_, _, p)| p.is_water() && p.terrain == Terrain::Coast));
        // areas were refreshed
        let (x, y) = stamp[0];
        assert!(grid.plot(x, y).area.is_some());
    }

    #[test]
    fn test_stamp_clips_at_map_edge() {
        let mut grid = ocean(10, 10);
        let template = Template::from_rows(&LOST_ISLE);
        let stamp = stamp_lost_isle(&mut grid, &mut seeded(2), &LatitudeTerrain::default(), &template, (0, 0));
        for (x, y) in stamp {
            assert!(x <= 2 && y <= 2);
        }
    }

    #[test]
    fn test_build_lost_isle_in_open_ocean() {
        let mut grid = ocean(30, 30);
        let mut regions = MapRegions::default();
        let centre = regions.build_lost_isle(&mut grid, &mut seeded(5), &LatitudeTerrain::default(), 100, 7, false);
        let centre = centre.expect("open ocean everywhere");
        assert!(grid.within_margin(centre.0, centre.1, 4));
        assert_eq!(regions.lost_isles().len(), 1);
        assert_eq!(regions.ledger(), &[centre]);
        assert_eq!(regions.records()[0].kind, RegionKind::LostIsle);
    }

    #[test]
    fn test_no_isle_without_open_ocean() {
        let mut grid = WorldGrid::from_ascii(&[".........."; 10]);
        let mut regions = MapRegions::default();
        let built = regions.build_lost_isle(&mut grid, &mut seeded(5), &LatitudeTerrain::default(), 100, 7, false);
        assert!(built.is_none());
        assert!(regions.ledger().is_empty());
    }

    #[test]
    fn test_zero_chance_builds_nothing() {
        let mut grid = ocean(30, 30);
        let mut regions = MapRegions::default();
        let built = regions.build_lost_isle(&mut grid, &mut seeded(5), &LatitudeTerrain::default(), 0, 7, false);
        assert!(built.is_none());
        assert_eq!(grid.to_ascii(), ocean(30, 30).to_ascii());
    }
}
