//! Anchor selection and spacing between regions.

use crate::grid::WorldGrid;

use super::MapRegions;

/// Which archetype an anchor is chosen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    /// Inland, in a marsh latitude zone
    Bog,
    /// Inland
    Dent,
}

/// A band of the double-dent ring: rows within `max_dy` of the first dent
/// must lie `extra` plots further out.
#[derive(Clone, Copy, Debug)]
pub struct RingBand {
    pub max_dy: i32,
    pub extra: i32,
}

/// Bands are cumulative: a row within 1 of the first dent adds all three.
pub const DOUBLE_DENT_BANDS: [RingBand; 3] = [
    RingBand { max_dy: 1, extra: 3 },
    RingBand { max_dy: 2, extra: 2 },
    RingBand { max_dy: 3, extra: 1 },
];

impl MapRegions {
    /// Smallest distance a new anchor must keep from every ledger anchor.
    pub fn min_region_distance(&self, grid: &WorldGrid) -> i32 {
        let size = grid.world_size().index();
        self.params.region_dist + size + 3 * size
    }

    /// True when (x, y) is far enough from every placed region.
    pub fn region_check(&self, grid: &WorldGrid, x: usize, y: usize) -> bool {
        let min = self.min_region_distance(grid);
        self.ledger.iter().all(|&(ax, ay)| {
            grid.plot_distance(x as i32, y as i32, ax as i32, ay as i32) >= min
        })
    }

    /// Archetype filter: no coastal land, margin from non-wrapping edges and,
    /// for bogs, a marsh latitude. Areas must be current.
    pub fn accepts(&self, grid: &WorldGrid, archetype: Archetype, x: usize, y: usize) -> bool {
        if grid.is_coastal_land(x, y) {
            return false;
        }
        if archetype == Archetype::Bog && !self.marsh.contains(grid.latitude(x, y)) {
            return false;
        }
        grid.within_margin(x, y, self.params.edge_margin)
    }

    /// Anchor candidates on the `n` largest land areas (skipping areas that
    /// contain a plot of `exclude`), row-major within each area.
    pub fn anchor_candidates(
        &self,
        grid: &mut WorldGrid,
        n: usize,
        exclude: &[(usize, usize)],
        archetype: Archetype,
    ) -> Vec<(usize, usize)> {
        let areas = grid.largest_areas(n, exclude, self.params.min_area_tiles);
        let mut candidates = Vec::new();
        for area in &areas {
            let before = candidates.len();
            candidates.extend(
                area.tiles
                    .iter()
                    .copied()
                    .filter(|&(x, y)| self.accepts(grid, archetype, x, y))
                    .filter(|&(x, y)| self.region_check(grid, x, y)),
            );
            tracing::debug!(
                "{archetype:?} area {}: {} tiles, {} candidates",
                area.id.0,
                area.tile_count(),
                candidates.len() - before
            );
        }
        candidates
    }

    /// Plots on a flattened ring of radius `rad` around (x0, y0), for a dent
    /// built alongside another one.
    pub fn double_dent_ring(&self, grid: &WorldGrid, x0: usize, y0: usize, rad: i32) -> Vec<(usize, usize)> {
        let (x0, y0) = (x0 as i32, y0 as i32);
        let mut ring = Vec::new();
        for dy in -rad..=rad {
            if dy.abs() > rad / 3 {
                continue;
            }
            let dist = rad
                + DOUBLE_DENT_BANDS
                    .iter()
                    .filter(|b| dy.abs() <= b.max_dy)
                    .map(|b| b.extra)
                    .sum::<i32>();
            for dx in -rad..=rad {
                let Some(plot) = grid.plot_xy(x0 + dx, y0 + dy) else {
                    continue;
                };
                if grid.plot_distance(x0, y0, x0 + dx, y0 + dy) == dist {
                    ring.push(plot);
                }
            }
        }
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldSize;

    fn continent() -> WorldGrid {
        let mut rows = Vec::new();
        for y in 0..16 {
            let row: String = (0..16)
                .map(|x| if (1..15).contains(&x) && (1..15).contains(&y) { '.' } else { '~' })
                .collect();
            rows.push(row);
        }
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        WorldGrid::from_ascii(&refs).with_world_size(WorldSize::Duel)
    }

    #[test]
    fn test_min_distance_scales_with_world_size() {
        let regions = MapRegions::default();
        let grid = WorldGrid::new(10, 10).with_world_size(WorldSize::Standard);
        assert_eq!(regions.min_region_distance(&grid), 15 + 3 + 9);
        let grid = grid.with_world_size(WorldSize::Duel);
        assert_eq!(regions.min_region_distance(&grid), 15);
    }

    #[test]
    fn test_region_check_uses_ledger() {
        let mut regions = MapRegions::default();
        let grid = WorldGrid::new(40, 10).with_world_size(WorldSize::Duel);
        assert!(regions.region_check(&grid, 0, 0));
        regions.ledger.push((0, 0));
        assert!(!regions.region_check(&grid, 14, 0));
        assert!(regions.region_check(&grid, 15, 0));
    }

    #[test]
    fn test_dent_candidates_skip_coast_and_margin() {
        let regions = MapRegions::default();
        let mut grid = continent();
        let candidates = regions.anchor_candidates(&mut grid, 2, &[], Archetype::Dent);
        assert!(!candidates.is_empty());
        for &(x, y) in &candidates {
            assert!(!grid.is_coastal_land(x, y));
            assert!((3..=12).contains(&x) && (3..=12).contains(&y));
        }
        // excluding the only continent leaves nothing
        assert!(regions
            .anchor_candidates(&mut grid, 2, &[(5, 5)], Archetype::Dent)
            .is_empty());
    }

    #[test]
    fn test_bog_candidates_need_marsh_latitude() {
        let regions = MapRegions::default();
        let mut grid = continent();
        for (x, y) in regions.anchor_candidates(&mut grid, 2, &[], Archetype::Bog) {
            assert!(regions.marsh.contains(grid.latitude(x, y)));
        }
    }

    #[test]
    fn test_double_dent_ring_distance() {
        let regions = MapRegions::default();
        let grid = WorldGrid::new(60, 30).with_wrap(true, false);
        let ring = regions.double_dent_ring(&grid, 30, 15, 12);
        assert!(!ring.is_empty());
        for (x, y) in ring {
            let dy = (y as i32 - 15).abs();
            assert!(dy <= 4);
            assert!(dy >= 3);
            assert!((x as i32 - 30).abs() >= 10);
        }
    }
}
