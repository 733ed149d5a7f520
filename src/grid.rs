//! The world grid: plots on a wrapping tilemap plus the topology queries
//! region and river builders depend on.

use serde::{Deserialize, Serialize};

use crate::areas::Area;
use crate::config::GridParams;
use crate::direction::{CardinalDirection, Direction};
use crate::error::SculptError;
use crate::plot::{AreaId, Feature, Plot, PlotKind, Resource, RiverId, Terrain};
use crate::tilemap::{Tilemap, MAX_DIMENSION};

/// World size class. Drives template pruning and region spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorldSize {
    Duel,
    Tiny,
    Small,
    #[default]
    Standard,
    Large,
    Huge,
}

impl WorldSize {
    pub const ALL: [WorldSize; 6] = [
        WorldSize::Duel,
        WorldSize::Tiny,
        WorldSize::Small,
        WorldSize::Standard,
        WorldSize::Large,
        WorldSize::Huge,
    ];

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, 5) as usize]
    }

    /// Rough size class for a grid of the given dimensions.
    pub fn for_dimensions(width: usize, height: usize) -> Self {
        match width * height {
            0..=1000 => WorldSize::Duel,
            1001..=2000 => WorldSize::Tiny,
            2001..=3000 => WorldSize::Small,
            3001..=4500 => WorldSize::Standard,
            4501..=7000 => WorldSize::Large,
            _ => WorldSize::Huge,
        }
    }
}

impl std::str::FromStr for WorldSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duel" => Ok(WorldSize::Duel),
            "tiny" => Ok(WorldSize::Tiny),
            "small" => Ok(WorldSize::Small),
            "standard" => Ok(WorldSize::Standard),
            "large" => Ok(WorldSize::Large),
            "huge" => Ok(WorldSize::Huge),
            _ => Err(format!("unknown world size: {s}")),
        }
    }
}

/// The shared mutable map every sculpting step works on.
#[derive(Clone, Debug)]
pub struct WorldGrid {
    plots: Tilemap<Plot>,
    world_size: WorldSize,
    params: GridParams,
    pub(crate) areas: Vec<Area>,
}

impl WorldGrid {
    /// All-ocean grid without wrapping. Dimensions are clamped to
    /// `1..=MAX_DIMENSION`, so coordinates convert to `i32` losslessly.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            plots: Tilemap::new(width, height),
            world_size: WorldSize::for_dimensions(width, height),
            params: GridParams::default(),
            areas: Vec::new(),
        }
    }

    /// Like [`WorldGrid::new`], but oversized or empty dimensions are an error.
    pub fn try_new(width: usize, height: usize) -> crate::error::Result<Self> {
        let valid = 1..=MAX_DIMENSION;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(SculptError::InvalidConfig(format!(
                "grid {width}x{height} outside 1..={MAX_DIMENSION} per side"
            )));
        }
        Ok(Self::new(width, height))
    }

    pub fn with_wrap(mut self, wrap_x: bool, wrap_y: bool) -> Self {
        self.plots.wrap_x = wrap_x;
        self.plots.wrap_y = wrap_y;
        self
    }

    pub fn with_world_size(mut self, world_size: WorldSize) -> Self {
        self.world_size = world_size;
        self
    }

    pub fn with_params(mut self, params: GridParams) -> Self {
        self.params = params;
        self
    }

    /// Build a grid from rows of plot kinds (`~` ocean, `.` land, `h` hills,
    /// `^` peak). Land gets grassland, water gets ocean terrain.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let kind = match c {
                    '.' => PlotKind::Land,
                    'h' => PlotKind::Hills,
                    '^' => PlotKind::Peak,
                    _ => PlotKind::Ocean,
                };
                let terrain = if kind.is_water() {
                    Terrain::Ocean
                } else {
                    Terrain::Grass
                };
                grid.plots.set(x, y, Plot::new(kind, terrain));
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.plots.width
    }

    pub fn height(&self) -> usize {
        self.plots.height
    }

    pub fn wrap_x(&self) -> bool {
        self.plots.wrap_x
    }

    pub fn wrap_y(&self) -> bool {
        self.plots.wrap_y
    }

    pub fn world_size(&self) -> WorldSize {
        self.world_size
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn num_plots(&self) -> usize {
        self.plots.len()
    }

    /// Reduce coordinates modulo the grid size, ignoring the wrap flags.
    pub fn normalize(&self, x: i32, y: i32) -> (usize, usize) {
        self.plots.normalize(x, y)
    }

    pub fn index_at(&self, x: i32, y: i32) -> usize {
        self.plots.index_at(x, y)
    }

    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        self.plots.coord_of(index)
    }

    /// Plot at any integer coordinate (normalized first).
    pub fn plot_at(&self, x: i32, y: i32) -> &Plot {
        self.plots.get_wrapped(x, y)
    }

    /// Coordinate of a plot as the map's topology sees it: `None` beyond a
    /// non-wrapping edge.
    pub fn plot_xy(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        self.plots.resolve(x, y)
    }

    pub fn plot(&self, x: usize, y: usize) -> &Plot {
        self.plots.get(x, y)
    }

    pub fn plot_mut(&mut self, x: usize, y: usize) -> &mut Plot {
        self.plots.get_mut(x, y)
    }

    /// Wrap-respecting neighbour in one of the eight directions.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.step();
        self.plot_xy(x as i32 + dx, y as i32 + dy)
    }

    pub fn cardinal_neighbor(
        &self,
        x: usize,
        y: usize,
        dir: CardinalDirection,
    ) -> Option<(usize, usize)> {
        self.neighbor(x, y, dir.direction())
    }

    /// Wrap-respecting 8-neighbourhood, row-major.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        self.plots.neighbors_8(x, y)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Plot)> {
        self.plots.iter()
    }

    /// Row-major coordinates of all plots matching a predicate.
    pub fn coords_where(&self, pred: impl Fn(&Plot) -> bool) -> Vec<(usize, usize)> {
        self.plots
            .iter()
            .filter(|(_, _, p)| pred(p))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Latitude in degrees (0 = equator, 90 = pole). Rows are spread evenly
    /// between the top and bottom latitude without touching the poles.
    /// Maps that wrap only north-south measure latitude along x.
    pub fn latitude(&self, x: usize, y: usize) -> i32 {
        let top = self.params.top_latitude as f64;
        let diff = (self.params.top_latitude - self.params.bottom_latitude) as f64;
        let (pos, len) = if !self.wrap_x() && self.wrap_y() {
            (x as f64, self.width() as f64)
        } else {
            (y as f64, self.height() as f64)
        };
        let lat = (top - (2.0 * pos + 1.0) * diff / (2.0 * len)).round().abs() as i32;
        lat.min(90)
    }

    /// Step distance: the longer axis delta plus half the shorter one.
    /// Wrapping axes take the shorter way round.
    pub fn plot_distance(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
        // dimensions are at most MAX_DIMENSION, the casts are lossless
        let w = self.width() as i32;
        let h = self.height() as i32;
        let mut dx = (x1 - x2).abs();
        let mut dy = (y1 - y2).abs();
        if self.wrap_x() {
            dx = dx.rem_euclid(w);
            dx = dx.min(w - dx);
        }
        if self.wrap_y() {
            dy = dy.rem_euclid(h);
            dy = dy.min(h - dy);
        }
        dx.max(dy) + dx.min(dy) / 2
    }

    /// True when (x, y) is at least `margin` plots away from every
    /// non-wrapping edge.
    pub fn within_margin(&self, x: usize, y: usize, margin: i32) -> bool {
        let (x, y) = (x as i32, y as i32);
        let w = self.width() as i32;
        let h = self.height() as i32;
        if !self.wrap_x() && (x < margin || x > w - 1 - margin) {
            return false;
        }
        if !self.wrap_y() && (y < margin || y > h - 1 - margin) {
            return false;
        }
        true
    }

    /// Plots in the square window around (x, y), centre excluded. Without
    /// `clamp` the window folds around every edge; with `clamp` it is clipped
    /// at non-wrapping axes.
    fn window(&self, x: usize, y: usize, radius: i32, clamp: bool) -> Vec<&Plot> {
        let mut result = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if clamp {
                    if let Some((px, py)) = self.plot_xy(nx, ny) {
                        result.push(self.plot(px, py));
                    }
                } else {
                    result.push(self.plot_at(nx, ny));
                }
            }
        }
        result
    }

    pub fn count_plot_neighbors(
        &self,
        x: usize,
        y: usize,
        kind: PlotKind,
        radius: i32,
        clamp: bool,
    ) -> usize {
        self.window(x, y, radius, clamp)
            .iter()
            .filter(|p| p.kind == kind)
            .count()
    }

    pub fn count_terrain_neighbors(
        &self,
        x: usize,
        y: usize,
        terrain: Terrain,
        radius: i32,
        clamp: bool,
    ) -> usize {
        self.window(x, y, radius, clamp)
            .iter()
            .filter(|p| p.terrain == terrain)
            .count()
    }

    pub fn count_feature_neighbors(
        &self,
        x: usize,
        y: usize,
        feature: Feature,
        radius: i32,
        clamp: bool,
    ) -> usize {
        self.window(x, y, radius, clamp)
            .iter()
            .filter(|p| p.feature == Some(feature))
            .count()
    }

    /// At most `threshold` non-water plots within `dist` of (x, y).
    pub fn is_high_seas(&self, x: usize, y: usize, dist: i32, clamp: bool, threshold: usize) -> bool {
        self.window(x, y, dist, clamp)
            .iter()
            .filter(|p| !p.is_water())
            .count()
            <= threshold
    }

    /// Area record for a plot, if areas are current.
    pub fn area_of(&self, x: usize, y: usize) -> Option<&Area> {
        let id = self.plot(x, y).area?;
        self.area(id)
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(id.0 as usize)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Water plot in a small enclosed water area.
    pub fn is_lake(&self, x: usize, y: usize) -> bool {
        self.plot(x, y).is_water()
            && self
                .area_of(x, y)
                .is_some_and(|a| a.is_lake(self.params.lake_max_tiles))
    }

    /// Land touching sea (water that is not a lake).
    pub fn is_coastal_land(&self, x: usize, y: usize) -> bool {
        if self.plot(x, y).is_water() {
            return false;
        }
        self.neighbors_8(x, y)
            .into_iter()
            .any(|(nx, ny)| self.plot(nx, ny).is_water() && !self.is_lake(nx, ny))
    }

    /// Next to a lake or a river.
    pub fn is_fresh_water(&self, x: usize, y: usize) -> bool {
        self.is_river_side(x, y)
            || self
                .neighbors_8(x, y)
                .into_iter()
                .any(|(nx, ny)| self.is_lake(nx, ny))
    }

    /// Any of the plot's four edges carries a river.
    pub fn is_river_side(&self, x: usize, y: usize) -> bool {
        let plot = self.plot(x, y);
        if plot.has_river_edge() {
            return true;
        }
        let north = self
            .cardinal_neighbor(x, y, CardinalDirection::North)
            .is_some_and(|(nx, ny)| self.plot(nx, ny).is_n_of_river());
        let west = self
            .cardinal_neighbor(x, y, CardinalDirection::West)
            .is_some_and(|(wx, wy)| self.plot(wx, wy).is_w_of_river());
        north || west
    }

    /// Change a plot's kind. Land that was water becomes grassland; water
    /// that was land becomes coast and loses its feature.
    pub fn set_plot_kind(&mut self, x: usize, y: usize, kind: PlotKind) {
        let plot = self.plot_mut(x, y);
        if plot.kind == kind {
            return;
        }
        let was_water = plot.is_water();
        plot.kind = kind;
        if was_water && !kind.is_water() {
            plot.terrain = Terrain::Grass;
        } else if !was_water && kind.is_water() {
            plot.terrain = Terrain::Coast;
            plot.feature = None;
        }
    }

    pub fn set_terrain(&mut self, x: usize, y: usize, terrain: Terrain) {
        self.plot_mut(x, y).terrain = terrain;
    }

    pub fn set_feature(&mut self, x: usize, y: usize, feature: Option<Feature>) {
        self.plot_mut(x, y).feature = feature;
    }

    pub fn set_resource(&mut self, x: usize, y: usize, resource: Option<Resource>) {
        self.plot_mut(x, y).resource = resource;
    }

    pub fn set_river_id(&mut self, x: usize, y: usize, id: RiverId) {
        self.plot_mut(x, y).river_id = Some(id);
    }

    /// Number of river edges owned by plots of the given area.
    pub fn river_edges_in(&self, area: AreaId) -> usize {
        self.iter()
            .filter(|(_, _, p)| p.area == Some(area))
            .map(|(_, _, p)| p.is_n_of_river() as usize + p.is_w_of_river() as usize)
            .sum()
    }

    /// Total river edges on the map.
    pub fn river_edge_count(&self) -> usize {
        self.iter()
            .map(|(_, _, p)| p.is_n_of_river() as usize + p.is_w_of_river() as usize)
            .sum()
    }

    /// ASCII rendering of plot kinds, one row per line.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(self.plot(x, y).kind.symbol());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_oversized_grids() {
        assert!(WorldGrid::try_new(40, 30).is_ok());
        assert!(matches!(
            WorldGrid::try_new(MAX_DIMENSION + 1, 4),
            Err(SculptError::InvalidConfig(_))
        ));
        assert!(WorldGrid::try_new(4, 0).is_err());
        assert_eq!(WorldGrid::new(0, 3).width(), 1);
    }

    #[test]
    fn test_from_ascii_and_back() {
        let rows = ["~~..", ".h^~"];
        let grid = WorldGrid::from_ascii(&rows);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.to_ascii(), "~~..\n.h^~\n");
        assert_eq!(grid.plot(3, 0).terrain, Terrain::Grass);
    }

    #[test]
    fn test_plot_at_always_resolves() {
        let grid = WorldGrid::from_ascii(&["~.", ".~"]);
        assert_eq!(grid.plot_at(-1, 0).kind, PlotKind::Land);
        assert_eq!(grid.plot_at(2, 3).kind, PlotKind::Land);
        assert_eq!(grid.plot_xy(-1, 0), None);
        assert_eq!(grid.index_at(-1, -1), 3);
    }

    #[test]
    fn test_plot_distance_wraps() {
        let grid = WorldGrid::new(20, 10);
        assert_eq!(grid.plot_distance(0, 0, 4, 2), 5);
        assert_eq!(grid.plot_distance(0, 0, 19, 0), 19);
        let torus = WorldGrid::new(20, 10).with_wrap(true, true);
        assert_eq!(torus.plot_distance(0, 0, 19, 0), 1);
        assert_eq!(torus.plot_distance(0, 0, 18, 9), 2);
    }

    #[test]
    fn test_latitude_is_symmetric_without_poles() {
        let grid = WorldGrid::new(4, 6);
        let lats: Vec<i32> = (0..6).map(|y| grid.latitude(0, y)).collect();
        assert_eq!(lats, vec![75, 45, 15, 15, 45, 75]);
    }

    #[test]
    fn test_neighbor_counting_clamps() {
        let grid = WorldGrid::from_ascii(&["^^^", "^.^", "^^^"]);
        assert_eq!(grid.count_plot_neighbors(1, 1, PlotKind::Peak, 1, true), 8);
        assert_eq!(grid.count_plot_neighbors(0, 0, PlotKind::Peak, 1, true), 2);
        // unclamped windows fold around the edges
        assert_eq!(grid.count_plot_neighbors(0, 0, PlotKind::Peak, 1, false), 7);
    }

    #[test]
    fn test_high_seas_threshold() {
        let grid = WorldGrid::from_ascii(&["~~~~~", "~~.~~", "~~~~~", "~~~~.", "~~~~~"]);
        assert!(grid.is_high_seas(2, 2, 1, true, 1));
        assert!(!grid.is_high_seas(2, 2, 2, true, 1));
        assert!(grid.is_high_seas(2, 2, 2, true, 2));
    }

    #[test]
    fn test_set_plot_kind_adjusts_terrain() {
        let mut grid = WorldGrid::from_ascii(&["~."]);
        grid.set_feature(1, 0, Some(Feature::Forest));
        grid.set_plot_kind(0, 0, PlotKind::Land);
        assert_eq!(grid.plot(0, 0).terrain, Terrain::Grass);
        grid.set_plot_kind(1, 0, PlotKind::Ocean);
        assert_eq!(grid.plot(1, 0).terrain, Terrain::Coast);
        assert_eq!(grid.plot(1, 0).feature, None);
    }

    #[test]
    fn test_river_side_checks_all_edges() {
        let mut grid = WorldGrid::from_ascii(&["...", "...", "..."]);
        // river along the south edge of (1, 0) is the north edge of (1, 1)
        grid.plot_mut(1, 0).n_of_river = Some(CardinalDirection::East);
        assert!(grid.is_river_side(1, 1));
        assert!(grid.is_river_side(1, 0));
        assert!(!grid.is_river_side(0, 1));
        // river along the east edge of (0, 2) is the west edge of (1, 2)
        grid.plot_mut(0, 2).w_of_river = Some(CardinalDirection::North);
        assert!(grid.is_river_side(1, 2));
        assert_eq!(grid.river_edge_count(), 2);
    }
}
