//! Rivers draining into lakes, built upstream from the shore.

use crate::direction::{CardinalDirection, Direction};
use crate::grid::WorldGrid;
use crate::plot::{AreaId, RiverId};
use crate::rng::RandomSource;

use super::{Flow, River, RiverMaker, RouteMode};

/// Offsets from a lake plot whose river ids count as touching the lake,
/// and which river flag (if any) the neighbour must carry.
const SHORE_RIVER_OFFSETS: [((i32, i32), ShoreEdge); 7] = [
    ((-1, 0), ShoreEdge::Any),
    ((-1, -1), ShoreEdge::Any),
    ((0, -1), ShoreEdge::Any),
    ((1, -1), ShoreEdge::South),
    ((1, 0), ShoreEdge::South),
    ((-1, 1), ShoreEdge::East),
    ((0, 1), ShoreEdge::East),
];

#[derive(Clone, Copy)]
enum ShoreEdge {
    Any,
    /// River along the neighbour's south edge
    South,
    /// River along the neighbour's east edge
    East,
}

impl RiverMaker {
    /// Grow up-flow rivers from a lake until it has `desired` rivers.
    ///
    /// With `area == None` areas are refreshed and every lake is handled.
    /// Non-lake areas are left alone; lakes smaller than a jittered
    /// `min_lake` are skipped; a single-tile lake gets at most one river.
    /// Each chosen outlet turns into a river with `chance` percent.
    pub fn build_rivers_from_lake<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        area: Option<AreaId>,
        chance: u32,
        desired: usize,
        min_lake: usize,
    ) -> Vec<River> {
        let Some(area_id) = area else {
            grid.recalculate_areas();
            let mut rivers = Vec::new();
            for lake in grid.lake_ids() {
                rivers.extend(self.build_rivers_from_lake(grid, rng, Some(lake), chance, desired, min_lake));
            }
            return rivers;
        };

        let lake_max = grid.params().lake_max_tiles;
        let Some(lake) = grid.area(area_id).filter(|a| a.is_lake(lake_max)).cloned() else {
            return Vec::new();
        };
        let size = lake.tile_count() as i64;
        if size < min_lake as i64 + rng.draw_int(3) as i64 - 1 {
            return Vec::new();
        }

        let existing = shore_rivers(grid, &lake.tiles);
        if existing.len() >= desired {
            return Vec::new();
        }

        let mut candidates: Vec<(CardinalDirection, (usize, usize))> = Vec::new();
        for &(x, y) in &lake.tiles {
            if !grid.plot(x, y).is_water() {
                tracing::warn!("lake plot ({x},{y}) of area {} is not water", area_id.0);
                continue;
            }
            if let Some(dir) = self.best_flow_dir(grid, rng, x, y, Flow::Up, RouteMode::Long, &[]) {
                candidates.push((dir, (x, y)));
            }
            for side in [Direction::West, Direction::North, Direction::NorthWest] {
                let Some((px, py)) = grid.neighbor(x, y, side) else {
                    continue;
                };
                if grid.plot(px, py).is_water() {
                    continue;
                }
                if let Some(dir) = self.best_flow_dir(grid, rng, px, py, Flow::Up, RouteMode::Long, &[]) {
                    candidates.push((dir, (px, py)));
                }
            }
        }
        rng.shuffle(&mut candidates);

        let mut rivers = Vec::new();
        let mut needed = desired - existing.len();
        for (dir, (x, y)) in candidates {
            if needed == 0 {
                break;
            }
            let Some((tx, ty)) = grid.cardinal_neighbor(x, y, dir) else {
                continue;
            };
            if grid.has_river_at_vertex(tx, ty) {
                continue;
            }
            needed -= 1;
            if rng.choose(chance as i32) {
                if let Some(river) = self.build_river(grid, rng, x, y, Flow::Up, Some(dir)) {
                    tracing::debug!("lake {} river from ({x},{y}) {dir}", area_id.0);
                    rivers.push(river);
                }
            }
            if lake.tile_count() == 1 {
                break;
            }
        }
        rivers
    }
}

/// Distinct ids of rivers running along the lake shore.
fn shore_rivers(grid: &WorldGrid, tiles: &[(usize, usize)]) -> Vec<RiverId> {
    let mut ids = Vec::new();
    for &(x, y) in tiles {
        for ((dx, dy), edge) in SHORE_RIVER_OFFSETS {
            let Some((px, py)) = grid.plot_xy(x as i32 + dx, y as i32 + dy) else {
                continue;
            };
            let plot = grid.plot(px, py);
            let Some(id) = plot.river_id else {
                continue;
            };
            let touches = match edge {
                ShoreEdge::Any => true,
                ShoreEdge::South => plot.is_n_of_river(),
                ShoreEdge::East => plot.is_w_of_river(),
            };
            if touches && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn lake_map() -> WorldGrid {
        WorldGrid::from_ascii(&[
            "hhhhhhhhh", //
            "h.......h", //
            "h.......h", //
            "h...~...h", //
            "h.......h", //
            "h.......h", //
            "hhhhhhhhh",
        ])
    }

    #[test]
    fn test_non_lake_area_is_untouched() {
        let mut grid = lake_map();
        grid.recalculate_areas();
        let land = grid.plot(1, 1).area;
        let mut maker = RiverMaker::default();
        let mut rng = seeded(3);
        let rivers = maker.build_rivers_from_lake(&mut grid, &mut rng, land, 100, 1, 1);
        assert!(rivers.is_empty());
        assert_eq!(grid.river_edge_count(), 0);
    }

    #[test]
    fn test_single_tile_lake_gets_one_river_at_most() {
        for seed in 0..10 {
            let mut grid = lake_map();
            grid.recalculate_areas();
            let lake = grid.plot(4, 3).area;
            let mut maker = RiverMaker::default();
            let mut rng = seeded(seed);
            let rivers = maker.build_rivers_from_lake(&mut grid, &mut rng, lake, 100, 3, 1);
            assert!(rivers.len() <= 1);
            for river in &rivers {
                assert_eq!(river.flow, Flow::Up);
            }
        }
    }

    #[test]
    fn test_all_lakes_mode() {
        let mut grid = lake_map();
        let mut maker = RiverMaker::default();
        let mut rng = seeded(8);
        let rivers = maker.build_rivers_from_lake(&mut grid, &mut rng, None, 100, 1, 1);
        assert!(rivers.len() <= 1);
        assert!(!grid.areas().is_empty());
    }

    #[test]
    fn test_existing_shore_river_is_counted() {
        let mut grid = lake_map();
        grid.recalculate_areas();
        // a river along the east edge of the plot west of the lake
        grid.plot_mut(3, 3).w_of_river = Some(CardinalDirection::South);
        grid.set_river_id(3, 3, RiverId(7));
        assert_eq!(shore_rivers(&grid, &[(4, 3)]), vec![RiverId(7)]);

        let lake = grid.plot(4, 3).area;
        let mut maker = RiverMaker::default();
        let mut rng = seeded(1);
        let rivers = maker.build_rivers_from_lake(&mut grid, &mut rng, lake, 100, 1, 1);
        assert!(rivers.is_empty());
    }
}
