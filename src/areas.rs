//! Connected area discovery
//!
//! Groups plots into maximal components that agree on water/land status and
//! caches the result on the grid. Area ids are indices into the area list and
//! stay valid only until the next recalculation.

use std::collections::VecDeque;

use crate::config::Connectivity;
use crate::direction::CardinalDirection;
use crate::grid::WorldGrid;
use crate::plot::AreaId;
use crate::tilemap::Tilemap;

/// Information about one connected area
#[derive(Clone, Debug, PartialEq)]
pub struct Area {
    pub id: AreaId,
    pub is_water: bool,
    /// Member coordinates in row-major order
    pub tiles: Vec<(usize, usize)>,
    /// Bounding box (min_x, min_y, max_x, max_y), ignoring wrap
    pub bounds: (usize, usize, usize, usize),
}

impl Area {
    fn new(id: AreaId, is_water: bool) -> Self {
        Self {
            id,
            is_water,
            tiles: Vec::new(),
            bounds: (usize::MAX, usize::MAX, 0, 0),
        }
    }

    fn add_tile(&mut self, x: usize, y: usize) {
        self.tiles.push((x, y));
        self.bounds.0 = self.bounds.0.min(x);
        self.bounds.1 = self.bounds.1.min(y);
        self.bounds.2 = self.bounds.2.max(x);
        self.bounds.3 = self.bounds.3.max(y);
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Water area small enough to count as a lake.
    pub fn is_lake(&self, lake_max_tiles: usize) -> bool {
        self.is_water && self.tile_count() <= lake_max_tiles
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.tiles.binary_search_by_key(&(y, x), |&(tx, ty)| (ty, tx)).is_ok()
    }
}

impl WorldGrid {
    fn area_neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        match self.params().connectivity {
            Connectivity::Four => CardinalDirection::ALL
                .iter()
                .filter_map(|&card| self.cardinal_neighbor(x, y, card))
                .collect(),
            Connectivity::Eight => self.neighbors_8(x, y),
        }
    }

    /// Full rescan of connected areas.
    ///
    /// Seeds are visited row-major, so ids are assigned in discovery order.
    /// Every plot gets its area id; the area list is cached on the grid.
    pub fn recalculate_areas(&mut self) -> &[Area] {
        let width = self.width();
        let height = self.height();
        let mut visited = Tilemap::new_with(width, height, false);
        let mut areas: Vec<Area> = Vec::new();

        for y in 0..height {
            for x in 0..width {
                if *visited.get(x, y) {
                    continue;
                }

                let is_water = self.plot(x, y).is_water();
                let mut area = Area::new(AreaId(areas.len() as u32), is_water);
                let mut queue = VecDeque::new();
                queue.push_back((x, y));
                visited.set(x, y, true);

                while let Some((ax, ay)) = queue.pop_front() {
                    area.add_tile(ax, ay);
                    for (nx, ny) in self.area_neighbors(ax, ay) {
                        if !*visited.get(nx, ny) && self.plot(nx, ny).is_water() == is_water {
                            visited.set(nx, ny, true);
                            queue.push_back((nx, ny));
                        }
                    }
                }

                area.tiles.sort_by_key(|&(tx, ty)| (ty, tx));
                areas.push(area);
            }
        }

        for area in &areas {
            for &(x, y) in &area.tiles {
                self.plot_mut(x, y).area = Some(area.id);
            }
        }
        tracing::debug!("recalculated {} areas", areas.len());
        self.areas = areas;
        &self.areas
    }

    /// Up to `n` largest land areas with at least `min_tiles` tiles, after
    /// dropping any area that contains a plot from `exclude`.
    ///
    /// Refreshes areas first. Sorted by tile count descending; equal sizes
    /// keep discovery order.
    pub fn largest_areas(
        &mut self,
        n: usize,
        exclude: &[(usize, usize)],
        min_tiles: usize,
    ) -> Vec<Area> {
        self.recalculate_areas();
        let excluded: Vec<AreaId> = exclude
            .iter()
            .filter_map(|&(x, y)| self.plot(x, y).area)
            .collect();

        let mut result: Vec<Area> = self
            .areas
            .iter()
            .filter(|a| !a.is_water && a.tile_count() >= min_tiles)
            .filter(|a| !excluded.contains(&a.id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.tile_count().cmp(&a.tile_count()));
        result.truncate(n);
        result
    }

    /// Ids of all lake areas, in discovery order.
    pub fn lake_ids(&self) -> Vec<AreaId> {
        let max = self.params().lake_max_tiles;
        self.areas
            .iter()
            .filter(|a| a.is_lake(max))
            .map(|a| a.id)
            .collect()
    }
}
