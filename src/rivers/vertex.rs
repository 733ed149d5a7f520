//! Lattice vertex queries.
//!
//! A vertex is the south-east corner of plot (x, y), shared by that plot and
//! its east, south and south-east neighbours. The four edges leaving it are
//! owned as follows:
//!
//! | edge  | lattice edge               | owner     | flag         |
//! |-------|----------------------------|-----------|--------------|
//! | North | east edge of (x, y)        | (x, y)    | `w_of_river` |
//! | East  | south edge of (x+1, y)     | east      | `n_of_river` |
//! | South | east edge of (x, y+1)      | south     | `w_of_river` |
//! | West  | south edge of (x, y)       | (x, y)    | `n_of_river` |

use crate::direction::{CardinalDirection, Direction};
use crate::grid::WorldGrid;
use crate::plot::{Plot, PlotKind};

impl WorldGrid {
    /// Plots sharing the vertex at the south-east corner of (x, y):
    /// the plot itself, east, south-east and south (missing beyond edges).
    pub fn vertex_plots(&self, x: usize, y: usize) -> [Option<(usize, usize)>; 4] {
        [
            Some((x, y)),
            self.neighbor(x, y, Direction::East),
            self.neighbor(x, y, Direction::SouthEast),
            self.neighbor(x, y, Direction::South),
        ]
    }

    /// Plot owning the edge that leaves the vertex of (x, y) in `dir`.
    pub fn edge_owner(&self, x: usize, y: usize, dir: CardinalDirection) -> Option<(usize, usize)> {
        match dir {
            CardinalDirection::North | CardinalDirection::West => Some((x, y)),
            CardinalDirection::East | CardinalDirection::South => self.cardinal_neighbor(x, y, dir),
        }
    }

    /// Flow recorded on the edge leaving the vertex of (x, y) in `dir`.
    pub fn edge_flow(&self, x: usize, y: usize, dir: CardinalDirection) -> Option<CardinalDirection> {
        let (ox, oy) = self.edge_owner(x, y, dir)?;
        edge_flag(self.plot(ox, oy), dir)
    }

    /// Record a river edge; returns false if the edge is off the map or
    /// already carries a river.
    pub(crate) fn set_edge_flow(
        &mut self,
        x: usize,
        y: usize,
        dir: CardinalDirection,
        flow: CardinalDirection,
    ) -> bool {
        let Some((ox, oy)) = self.edge_owner(x, y, dir) else {
            return false;
        };
        let plot = self.plot_mut(ox, oy);
        let slot = if dir.is_vertical() {
            &mut plot.w_of_river
        } else {
            &mut plot.n_of_river
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(flow);
        true
    }

    /// Any river edge touches the vertex of (x, y).
    pub fn has_river_at_vertex(&self, x: usize, y: usize) -> bool {
        CardinalDirection::ALL
            .iter()
            .any(|&dir| self.edge_flow(x, y, dir).is_some())
    }

    /// Directions from the vertex whose edges carry no river.
    pub fn free_vertex_directions(&self, x: usize, y: usize) -> Vec<CardinalDirection> {
        CardinalDirection::ALL
            .iter()
            .copied()
            .filter(|&dir| self.edge_flow(x, y, dir).is_none())
            .collect()
    }

    pub fn has_kind_at_vertex(&self, x: usize, y: usize, kind: PlotKind) -> bool {
        self.vertex_plots(x, y)
            .into_iter()
            .flatten()
            .any(|(px, py)| self.plot(px, py).kind == kind)
    }

    pub fn has_water_at_vertex(&self, x: usize, y: usize) -> bool {
        self.has_kind_at_vertex(x, y, PlotKind::Ocean)
    }

    /// The edge in `dir` leads off a non-wrapping edge of the map.
    pub fn is_edge_direction(&self, x: usize, y: usize, dir: CardinalDirection) -> bool {
        let Some((tx, ty)) = self.cardinal_neighbor(x, y, dir) else {
            return true;
        };
        match dir {
            CardinalDirection::South | CardinalDirection::East => {
                self.cardinal_neighbor(tx, ty, dir).is_none()
            }
            _ => false,
        }
    }
}

fn edge_flag(plot: &Plot, dir: CardinalDirection) -> Option<CardinalDirection> {
    if dir.is_vertical() {
        plot.w_of_river
    } else {
        plot.n_of_river
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardinalDirection::*;

    #[test]
    fn test_edge_ownership_is_unique() {
        let grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        assert_eq!(grid.edge_owner(1, 1, North), Some((1, 1)));
        assert_eq!(grid.edge_owner(1, 1, West), Some((1, 1)));
        assert_eq!(grid.edge_owner(1, 1, East), Some((2, 1)));
        assert_eq!(grid.edge_owner(1, 1, South), Some((1, 2)));
        assert_eq!(grid.edge_owner(2, 1, East), None);
    }

    #[test]
    fn test_edge_seen_from_both_ends() {
        let mut grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        assert!(grid.set_edge_flow(0, 0, East, East));
        // the same edge seen from the vertex of (1, 0) runs west
        assert_eq!(grid.edge_flow(1, 0, West), Some(East));
        assert!(!grid.set_edge_flow(1, 0, West, West));
        assert!(grid.has_river_at_vertex(0, 0));
        assert!(grid.has_river_at_vertex(1, 0));
        assert!(!grid.has_river_at_vertex(0, 1));
        assert_eq!(grid.free_vertex_directions(0, 0), vec![North, South, West]);
    }

    #[test]
    fn test_vertex_kinds() {
        let grid = WorldGrid::from_ascii(&["..~", ".^.", "..."]);
        assert!(grid.has_kind_at_vertex(0, 0, PlotKind::Peak));
        assert!(!grid.has_water_at_vertex(0, 0));
        assert!(grid.has_water_at_vertex(1, 0));
        assert!(grid.has_kind_at_vertex(1, 1, PlotKind::Peak));
    }

    #[test]
    fn test_edge_direction() {
        let grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        assert!(grid.is_edge_direction(0, 0, North));
        assert!(!grid.is_edge_direction(1, 1, West));
        assert!(grid.is_edge_direction(1, 1, South));
        assert!(grid.is_edge_direction(1, 1, East));
        assert!(!grid.is_edge_direction(0, 0, East));
        let torus = WorldGrid::from_ascii(&["...", "...", "..."]).with_wrap(true, true);
        assert!(!torus.is_edge_direction(0, 0, North));
    }
}
