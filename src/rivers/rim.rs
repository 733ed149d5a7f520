//! River starts on a ring around a region anchor.

use crate::direction::{CardinalDirection, Direction};
use crate::grid::WorldGrid;
use crate::rng::RandomSource;

use super::Flow;

/// A candidate river start: the vertex plot, the first edge and the coarse
/// direction of the plot as seen from the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RimStart {
    pub direction: Direction,
    pub x: usize,
    pub y: usize,
    pub edge: CardinalDirection,
}

/// Gather river starts at the given plot distances from the anchor.
///
/// Down-flow: peaks count twice, hills once, vertices at water and plots
/// already beside a river are dropped. Up-flow: vertices with one or two
/// valid directions or already beside a river, limited to edges not yet
/// carrying a river. Each start's edge is one of the cardinals of the coarse
/// direction from the anchor. The result is shuffled.
pub fn rim_rivers<R: RandomSource>(
    grid: &WorldGrid,
    rng: &mut R,
    anchor: (usize, usize),
    distances: &[i32],
    flow: Flow,
) -> Vec<RimStart> {
    let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);

    // ring plots with their unwrapped coordinates
    let mut ring: Vec<((usize, usize), (i32, i32))> = Vec::new();
    for &dist in distances {
        for dy in -dist..=dist {
            for dx in -dist..=dist {
                let (fx, fy) = (ax + dx, ay + dy);
                if grid.plot_distance(ax, ay, fx, fy) != dist {
                    continue;
                }
                let Some((px, py)) = grid.plot_xy(fx, fy) else {
                    continue;
                };
                match flow {
                    Flow::Down => {
                        if grid.has_water_at_vertex(px, py) {
                            continue;
                        }
                        let plot = grid.plot(px, py);
                        if plot.is_peak() {
                            ring.push(((px, py), (fx, fy)));
                            ring.push(((px, py), (fx, fy)));
                        } else if plot.is_hills() {
                            ring.push(((px, py), (fx, fy)));
                        }
                    }
                    Flow::Up => {
                        let n = grid.check_river_end(px, py, flow).len();
                        if n == 1 || n == 2 || grid.is_river_side(px, py) {
                            ring.push(((px, py), (fx, fy)));
                        }
                    }
                }
            }
        }
    }

    let mut starts = Vec::new();
    for ((px, py), (fx, fy)) in ring {
        let Some(direction) = Direction::classify(ax, ay, fx, fy) else {
            continue;
        };
        let cardinals = direction.cardinals();
        match flow {
            Flow::Up => {
                let mut dirs = grid.check_river_end(px, py, flow);
                if grid.has_river_at_vertex(px, py) {
                    let free = grid.free_vertex_directions(px, py);
                    dirs.retain(|d| free.contains(d));
                }
                dirs.retain(|d| cardinals.contains(d));
                for edge in dirs {
                    starts.push(RimStart { direction, x: px, y: py, edge });
                }
            }
            Flow::Down => {
                for &edge in &cardinals {
                    starts.push(RimStart { direction, x: px, y: py, edge });
                    if cardinals.len() == 1 {
                        if let Some((nx, ny)) = grid.neighbor(px, py, Direction::NorthWest) {
                            if !grid.plot(nx, ny).is_water() {
                                starts.push(RimStart { direction, x: nx, y: ny, edge });
                            }
                        }
                    }
                }
            }
        }
    }

    if flow == Flow::Down {
        starts.retain(|s| !grid.is_river_side(s.x, s.y));
    }
    rng.shuffle(&mut starts);
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn ringed() -> WorldGrid {
        WorldGrid::from_ascii(&[
            ".........", //
            ".^^^^^^^.", //
            ".^.....^.", //
            ".^.....^.", //
            ".^.....^.", //
            ".^.....^.", //
            ".^.....^.", //
            ".^^^^^^^.", //
            ".........",
        ])
    }

    #[test]
    fn test_down_flow_starts_point_outward() {
        let grid = ringed();
        let mut rng = seeded(2);
        let starts = rim_rivers(&grid, &mut rng, (4, 4), &[3], Flow::Down);
        assert!(!starts.is_empty());
        for s in &starts {
            assert!(s.direction.cardinals().contains(&s.edge));
            // starts north of the anchor flow north-ish and so on
            if s.y < 3 {
                assert!(!matches!(s.edge, CardinalDirection::South));
            }
        }
    }

    #[test]
    fn test_peaks_weighted_twice() {
        let grid = ringed();
        let starts = rim_rivers(&grid, &mut seeded(1), (4, 4), &[3], Flow::Down);
        let north = starts
            .iter()
            .filter(|s| (s.x, s.y) == (4, 1) && s.edge == CardinalDirection::North)
            .count();
        assert_eq!(north, 2);
    }

    #[test]
    fn test_rim_skips_river_side_plots() {
        let mut grid = ringed();
        grid.plot_mut(4, 1).w_of_river = Some(CardinalDirection::North);
        let starts = rim_rivers(&grid, &mut seeded(1), (4, 4), &[3], Flow::Down);
        assert!(starts.iter().all(|s| (s.x, s.y) != (4, 1)));
    }

    #[test]
    fn test_reproducible() {
        let grid = ringed();
        let a = rim_rivers(&grid, &mut seeded(6), (4, 4), &[3, 2], Flow::Up);
        let b = rim_rivers(&grid, &mut seeded(6), (4, 4), &[3, 2], Flow::Up);
        assert_eq!(a, b);
    }
}
