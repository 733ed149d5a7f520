//! Flow direction heuristics: valid edges from a vertex and the smoothed
//! heights used to pick among them.

use crate::direction::CardinalDirection;
use crate::grid::WorldGrid;
use crate::plot::Plot;
use crate::rng::RandomSource;

use super::{Flow, RiverMaker, RouteMode};

/// Best-value sentinels for the greedy comparison
const HEIGHT_MIN: f32 = 0.0;
const HEIGHT_MAX: f32 = 99999.0;

/// Ordinal height of a single plot; `None` is a plot beyond the map edge.
pub fn base_height(plot: Option<&Plot>) -> f32 {
    match plot {
        Some(p) if p.is_water() => 0.0,
        Some(p) if p.is_flat() => 0.2,
        Some(p) if p.is_hills() => 0.5,
        Some(p) if p.is_peak() => 1.0,
        _ => 0.01,
    }
}

impl WorldGrid {
    fn plot_opt(&self, x: i32, y: i32) -> Option<&Plot> {
        self.plot_xy(x, y).map(|(px, py)| self.plot(px, py))
    }

    fn is_land_at(&self, x: i32, y: i32) -> bool {
        self.plot_opt(x, y).is_some_and(|p| !p.is_water())
    }

    /// Directions a river may take from the vertex of (x, y), in the order
    /// west, north, east, south. Both plots flanking an edge must be land.
    /// Up-flow rivers stay inside the map and may not run into a vertex that
    /// already touches a river or water.
    pub fn check_river_end(&self, x: usize, y: usize, flow: Flow) -> Vec<CardinalDirection> {
        let (ix, iy) = (x as i32, y as i32);
        let here = !self.plot(x, y).is_water();
        let east = self.is_land_at(ix + 1, iy);
        let south = self.is_land_at(ix, iy + 1);
        let south_east = self.is_land_at(ix + 1, iy + 1);

        let mut dirs = Vec::with_capacity(4);
        if here && south {
            dirs.push(CardinalDirection::West);
        }
        if here && east {
            dirs.push(CardinalDirection::North);
        }
        if east && south_east {
            dirs.push(CardinalDirection::East);
        }
        if south_east && south {
            dirs.push(CardinalDirection::South);
        }

        if flow == Flow::Up {
            dirs.retain(|&dir| {
                if self.is_edge_direction(x, y, dir) {
                    return false;
                }
                match self.cardinal_neighbor(x, y, dir) {
                    Some((tx, ty)) => {
                        !(self.has_river_at_vertex(tx, ty) || self.has_water_at_vertex(tx, ty))
                    }
                    None => false,
                }
            });
        }
        dirs
    }
}

impl RiverMaker {
    /// Smoothed height of a plot: the plot counts five times, its 3x3
    /// neighbourhood once each, water nearby lowers it, plus a small jitter.
    pub fn plot_height<R: RandomSource>(&self, grid: &WorldGrid, x: usize, y: usize, rng: &mut R) -> f32 {
        let mut height = 4.0 * base_height(Some(grid.plot(x, y)));
        let mut weight = 4.0;
        let mut near_water = false;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let h = base_height(grid.plot_opt(x as i32 + dx, y as i32 + dy));
                if h > 0.0 {
                    weight += 1.0;
                    height += h;
                } else {
                    near_water = true;
                }
            }
        }
        if near_water {
            weight += 1.0;
        }
        height += rng.draw_int(20) as f32 / 10.0;
        120.0 * height / weight
    }

    /// Height of the vertex of (x, y): mean height of the plots sharing it.
    pub fn vertex_height<R: RandomSource>(&self, grid: &WorldGrid, x: usize, y: usize, rng: &mut R) -> f32 {
        let mut total = 0.0;
        let mut count = 0.0;
        for (px, py) in grid.vertex_plots(x, y).into_iter().flatten() {
            total += self.plot_height(grid, px, py, rng);
            count += 1.0;
        }
        total / count
    }

    /// Pick a flow direction from the vertex of (x, y).
    ///
    /// The highest and lowest target vertices are tracked greedily; a better
    /// candidate only replaces the current best with `best_route_chance`.
    /// Edges leading off the map are taken outright with `edge_chance` and
    /// dropped otherwise.
    /// In long mode a down-flow river starts uphill (toward its source) and an
    /// up-flow river downhill; short mode is the reverse.
    pub fn best_flow_dir<R: RandomSource>(
        &self,
        grid: &WorldGrid,
        rng: &mut R,
        x: usize,
        y: usize,
        flow: Flow,
        mode: RouteMode,
        forbidden: &[CardinalDirection],
    ) -> Option<CardinalDirection> {
        let mut best_up = HEIGHT_MIN;
        let mut up_dir = None;
        let mut best_down = HEIGHT_MAX;
        let mut down_dir = None;

        for dir in grid.check_river_end(x, y, flow) {
            if forbidden.contains(&dir) {
                continue;
            }
            if grid.is_edge_direction(x, y, dir) {
                if rng.choose(self.params.edge_chance as i32) {
                    best_up = HEIGHT_MAX;
                    up_dir = Some(dir);
                    best_down = HEIGHT_MIN;
                    down_dir = Some(dir);
                }
                continue;
            }
            let Some((tx, ty)) = grid.cardinal_neighbor(x, y, dir) else {
                continue;
            };
            let value = self.vertex_height(grid, tx, ty, rng);
            if value > best_up
                && (best_up == HEIGHT_MIN || rng.choose(self.params.best_route_chance as i32))
            {
                best_up = value;
                up_dir = Some(dir);
            }
            if value < best_down
                && (best_down == HEIGHT_MAX || rng.choose(self.params.best_route_chance as i32))
            {
                best_down = value;
                down_dir = Some(dir);
            }
        }

        match (mode, flow) {
            (RouteMode::Short, Flow::Down) | (RouteMode::Long, Flow::Up) => down_dir,
            (RouteMode::Short, Flow::Up) | (RouteMode::Long, Flow::Down) => up_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiverParams;
    use crate::rng::seeded;
    use crate::rng::testing::Scripted;
    use CardinalDirection::*;

    #[test]
    fn test_check_river_end_needs_land_on_both_sides() {
        let grid = WorldGrid::from_ascii(&[
            ".....", //
            ".....", //
            "..~..", //
            ".....",
        ]);
        assert_eq!(grid.check_river_end(0, 0, Flow::Down), vec![West, North, East, South]);
        // vertex of (1, 1) touches the water at (2, 2)
        assert_eq!(grid.check_river_end(1, 1, Flow::Down), vec![West, North]);
        // beyond the map edge nothing is valid on that side
        assert_eq!(grid.check_river_end(4, 3, Flow::Down), Vec::<CardinalDirection>::new());
    }

    #[test]
    fn test_up_flow_avoids_water_and_rivers() {
        let mut grid = WorldGrid::from_ascii(&[
            ".....", //
            ".....", //
            "...~.", //
            ".....",
        ]);
        // east of (1, 1) is the vertex of (2, 1), which touches the water at (3, 2)
        let up = grid.check_river_end(1, 1, Flow::Up);
        assert!(!up.contains(&East));
        assert!(up.contains(&West));
        grid.set_edge_flow(1, 0, North, North);
        let up = grid.check_river_end(1, 1, Flow::Up);
        assert!(!up.contains(&North));
    }

    #[test]
    fn test_up_flow_stays_inside_the_map() {
        let grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        assert_eq!(grid.check_river_end(0, 0, Flow::Down), vec![West, North, East, South]);
        assert_eq!(grid.check_river_end(0, 0, Flow::Up), vec![East, South]);
        assert_eq!(grid.check_river_end(1, 1, Flow::Down), vec![West, North, East, South]);
        assert_eq!(grid.check_river_end(1, 1, Flow::Up), vec![West, North]);
    }

    #[test]
    fn test_map_exits_follow_edge_chance() {
        let grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        // from the vertex of (1, 1) both east and south lead off the map
        let inward = [West, North];
        let closed = RiverMaker::new(RiverParams {
            edge_chance: 0,
            ..RiverParams::default()
        });
        let open = RiverMaker::new(RiverParams {
            edge_chance: 100,
            ..RiverParams::default()
        });
        for seed in 0..10 {
            let mut rng = seeded(seed);
            assert_eq!(
                closed.best_flow_dir(&grid, &mut rng, 1, 1, Flow::Down, RouteMode::Short, &inward),
                None
            );
            let dir = open.best_flow_dir(&grid, &mut rng, 1, 1, Flow::Down, RouteMode::Short, &inward);
            assert!(dir.is_some_and(|d| grid.is_edge_direction(1, 1, d)));
        }
    }

    #[test]
    fn test_base_heights() {
        let grid = WorldGrid::from_ascii(&["~.h^"]);
        assert_eq!(base_height(Some(grid.plot(0, 0))), 0.0);
        assert_eq!(base_height(Some(grid.plot(1, 0))), 0.2);
        assert_eq!(base_height(Some(grid.plot(2, 0))), 0.5);
        assert_eq!(base_height(Some(grid.plot(3, 0))), 1.0);
        assert_eq!(base_height(None), 0.01);
    }

    #[test]
    fn test_plot_height_without_jitter() {
        let grid = WorldGrid::from_ascii(&["...", ".^.", "..."]);
        let maker = RiverMaker::new(RiverParams::default());
        let mut rng = Scripted::new(&[0]);
        // 4 * 1.0 + 1.0 + 8 * 0.2 over 4 + 9 samples
        let expected = 120.0 * (4.0 + 1.0 + 1.6) / 13.0;
        let h = maker.plot_height(&grid, 1, 1, &mut rng);
        assert!((h - expected).abs() < 1e-3);
    }

    #[test]
    fn test_short_down_flow_runs_downhill() {
        let grid = WorldGrid::from_ascii(&[
            "^^^^^^", //
            "^^^^^^", //
            "^^^^^^", //
            "......", //
            "......", //
            "......",
        ])
        .with_wrap(true, true);
        let params = RiverParams {
            best_route_chance: 100,
            ..RiverParams::default()
        };
        let maker = RiverMaker::new(params);
        let mut rng = seeded(5);
        let dir = maker.best_flow_dir(&grid, &mut rng, 2, 2, Flow::Down, RouteMode::Short, &[]);
        assert_eq!(dir, Some(South));
        let dir = maker.best_flow_dir(&grid, &mut rng, 2, 2, Flow::Down, RouteMode::Long, &[]);
        assert_eq!(dir, Some(North));
    }

    #[test]
    fn test_forbidden_directions_are_skipped() {
        let grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        let maker = RiverMaker::new(RiverParams::default());
        let mut rng = seeded(9);
        let all = [West, North, East, South];
        assert_eq!(
            maker.best_flow_dir(&grid, &mut rng, 0, 0, Flow::Down, RouteMode::Short, &all),
            None
        );
    }
}
