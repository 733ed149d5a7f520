//! Bogs: marshy lowland with an optional lake, ringed by low hills.

use crate::direction::Direction;
use crate::grid::{WorldGrid, WorldSize};
use crate::plot::{PlotKind, Terrain};
use crate::rivers::rim::rim_rivers;
use crate::rivers::{Flow, RiverMaker};
use crate::rng::RandomSource;

use super::placement::Archetype;
use super::template::{Template, BIG_BOG, SMALL_BOG};
use super::{BogSite, MapRegions, RegionKind};

/// Chance to turn flat land into a peak (else hills) at symbol 5
const PEAK_HILL_CHANCE: i32 = 80;
/// Chance to flatten hills and peaks inside the bog
const FLATTEN_CHANCE: i32 = 80;
/// Chance for a lake at symbol 1
const LAKE_CHANCE: i32 = 90;
/// Chance for marsh on flat land at symbol 3
const MARSH_CHANCE: i32 = 66;
/// Chance to soften dry or cold terrain at symbol 4
const GRASS_CHANCE: i32 = 50;

pub const BIG_BOG_NAME: &str = "Big Bog";
pub const SMALL_BOG_NAME: &str = "Darkwater";

impl MapRegions {
    /// Build up to `count` bogs: the Big Bog on one of the two largest land
    /// areas, then a small bog with a lake and one without on the four
    /// largest. Returns the number built.
    pub fn build_bogs<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        count: u32,
    ) -> u32 {
        let mut built = 0;
        let mut small_chance = self.params.small_bog_chance as i32;

        if rng.choose(self.params.big_bog_chance as i32) && count > built {
            let candidates = self.anchor_candidates(grid, 2, &[], Archetype::Bog);
            match rng.pick(&candidates) {
                Some(anchor) => {
                    let name_plot = self.the_bog(grid, rng, rivers, anchor, true, true);
                    self.register(RegionKind::Bog, BIG_BOG_NAME, anchor, name_plot, false);
                    built += 1;
                }
                None => tracing::info!("no room for the Big Bog"),
            }
        }

        if rng.choose(small_chance) && count > built {
            let candidates = self.anchor_candidates(grid, 4, &[], Archetype::Bog);
            match rng.pick(&candidates) {
                Some(anchor) => {
                    let name_plot = self.the_bog(grid, rng, rivers, anchor, false, true);
                    self.register(RegionKind::Bog, SMALL_BOG_NAME, anchor, name_plot, false);
                    built += 1;
                    if grid.world_size() < WorldSize::Small {
                        small_chance /= 2;
                    }
                }
                None => tracing::info!("no room for a small bog with lake"),
            }
        }

        if rng.choose(small_chance) && count > built {
            let candidates = self.anchor_candidates(grid, 4, &[], Archetype::Bog);
            match rng.pick(&candidates) {
                Some(anchor) => {
                    let name_plot = self.the_bog(grid, rng, rivers, anchor, false, false);
                    self.register(RegionKind::Bog, SMALL_BOG_NAME, anchor, name_plot, false);
                    built += 1;
                }
                None => tracing::info!("no room for a small bog without lake"),
            }
        }

        tracing::info!("{built} bogs built");
        built
    }

    /// Carve one bog around `anchor` and return its landmark plot: the lake
    /// plot of the template, or the anchor when the template has none.
    /// The Big Bog always gets a lake.
    pub fn the_bog<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        anchor: (usize, usize),
        big: bool,
        lake: bool,
    ) -> (usize, usize) {
        let template = bog_template(grid.world_size(), big, rng);
        let rot = rng.draw_int(4);
        let template = template.rotate(rot);
        tracing::debug!("bog template rotated {} degrees", rot * 90);

        let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);
        let ext = template.extents(ax, ay);
        let cells = template.placed(ax, ay);

        let name_plot = template
            .find(1)
            .and_then(|(r, c)| grid.plot_xy(ext.min_x + c as i32, ext.min_y + r as i32))
            .unwrap_or(anchor);
        let lake = lake || big;
        self.bogs.push(BogSite {
            anchor,
            name_plot,
            big,
            lake,
        });
        tracing::info!(
            "building {} bog at ({},{}) {}",
            if big { "big" } else { "small" },
            name_plot.0,
            name_plot.1,
            if lake { "with lake" } else { "without lake" }
        );

        // pass 1: plot kinds
        for &(fx, fy, symbol) in &cells {
            let Some(symbol) = symbol.filter(|&s| s > 0) else {
                continue;
            };
            let Some((x, y)) = grid.plot_xy(fx, fy) else {
                continue;
            };
            if grid.is_lake(x, y) {
                continue;
            }
            let kind = grid.plot(x, y).kind;
            if symbol == 5 {
                match kind {
                    PlotKind::Land => {
                        let k = if rng.choose(PEAK_HILL_CHANCE) { PlotKind::Peak } else { PlotKind::Hills };
                        grid.set_plot_kind(x, y, k);
                    }
                    PlotKind::Ocean => {
                        let k = if rng.choose(PEAK_HILL_CHANCE / 2) { PlotKind::Peak } else { PlotKind::Hills };
                        grid.set_plot_kind(x, y, k);
                    }
                    _ => {}
                }
            } else {
                let flatten = if symbol == 4 { 100 - FLATTEN_CHANCE } else { FLATTEN_CHANCE };
                match kind {
                    PlotKind::Ocean => grid.set_plot_kind(x, y, PlotKind::Land),
                    PlotKind::Peak => {
                        let k = if rng.choose(flatten) { PlotKind::Land } else { PlotKind::Hills };
                        grid.set_plot_kind(x, y, k);
                    }
                    PlotKind::Hills => {
                        if rng.choose(flatten) {
                            grid.set_plot_kind(x, y, PlotKind::Land);
                        }
                    }
                    PlotKind::Land => {}
                }
            }
            if symbol == 1 && rng.choose(LAKE_CHANCE) {
                grid.set_plot_kind(x, y, PlotKind::Ocean);
            }
        }

        let (nx, ny) = name_plot;
        if lake {
            grid.set_plot_kind(nx, ny, PlotKind::Ocean);
        } else {
            if grid.plot(nx, ny).is_water() {
                grid.set_plot_kind(nx, ny, PlotKind::Land);
            }
            if grid.plot(nx, ny).is_flat() {
                grid.set_terrain(nx, ny, Terrain::Marsh);
            }
        }

        // pass 2: terrain
        for &(fx, fy, symbol) in &cells {
            let Some(symbol) = symbol.filter(|&s| s > 0) else {
                continue;
            };
            let Some((x, y)) = grid.plot_xy(fx, fy) else {
                continue;
            };
            let plot = grid.plot(x, y);
            if plot.is_water() || plot.is_peak() {
                continue;
            }
            let (flat, terrain) = (plot.is_flat(), plot.terrain);
            match symbol {
                1 | 2 if flat => grid.set_terrain(x, y, Terrain::Marsh),
                3 if flat && rng.choose(MARSH_CHANCE) => grid.set_terrain(x, y, Terrain::Marsh),
                4 if matches!(terrain, Terrain::Desert | Terrain::Snow | Terrain::Tundra)
                    && rng.choose(GRASS_CHANCE) =>
                {
                    grid.set_terrain(x, y, Terrain::Grass)
                }
                _ => {}
            }
            let plot = grid.plot(x, y);
            if plot.is_hills() && plot.terrain == Terrain::Marsh {
                grid.set_terrain(x, y, Terrain::Grass);
            }
        }

        // pass 3: no snow or desert right outside
        for fy in ext.min_y - 1..=ext.max_y + 1 {
            for fx in ext.min_x - 1..=ext.max_x + 1 {
                if !ext.on_border(fx, fy) {
                    continue;
                }
                let Some((x, y)) = grid.plot_xy(fx, fy) else {
                    continue;
                };
                match grid.plot(x, y).terrain {
                    Terrain::Snow => grid.set_terrain(x, y, Terrain::Tundra),
                    Terrain::Desert => grid.set_terrain(x, y, Terrain::Plains),
                    _ => {}
                }
            }
        }

        // pass 4: drainage
        grid.recalculate_areas();
        if grid.plot(nx, ny).is_water() {
            let area = grid.plot(nx, ny).area;
            let built = rivers.build_rivers_from_lake(grid, rng, area, 100, 1 + big as usize, 1);
            self.rivers.extend(built);
        } else {
            self.rim_drainage(grid, rng, rivers, name_plot);
        }
        name_plot
    }

    /// Up to two down-flow rivers from the bog rim, never twice toward the
    /// same or a neighbouring direction.
    fn rim_drainage<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        centre: (usize, usize),
    ) {
        let mut starts = rim_rivers(grid, rng, centre, &self.params.bog_rim_distances, Flow::Down);
        let mut blocked: Vec<Direction> = Vec::new();
        for _ in 0..2 {
            let Some(mut start) = rng.pick(&starts) else {
                break;
            };
            while blocked.contains(&start.direction) {
                match rng.pop(&mut starts) {
                    Some(next) => start = next,
                    None => break,
                }
            }
            if blocked.contains(&start.direction) {
                break;
            }
            if blocked.is_empty() {
                let d = start.direction;
                blocked.extend([d, d.rotate(1), d.rotate(-1)]);
            }
            tracing::debug!("bog river from ({},{}) {}", start.x, start.y, start.edge);
            if let Some(river) = rivers.build_river(grid, rng, start.x, start.y, Flow::Down, Some(start.edge)) {
                self.rivers.push(river);
            }
        }
    }
}

/// Bog template for the world size; smaller worlds lose rows.
fn bog_template<R: RandomSource>(size: WorldSize, big: bool, rng: &mut R) -> Template {
    if big {
        let template = Template::from_rows(&BIG_BOG);
        return if size < WorldSize::Large {
            template.without_row(5)
        } else {
            template
        };
    }
    let mut template = Template::from_rows(&SMALL_BOG);
    if size < WorldSize::Large && rng.choose(80) {
        template = template.without_row(5);
    }
    if size < WorldSize::Small && rng.choose(80) {
        template = template.without_row(3);
    }
    template
}
