//! Dents: mountain ranges pushed up out of a continent.

use crate::direction::{CardinalDirection, Direction};
use crate::grid::{WorldGrid, WorldSize};
use crate::plot::{Feature, PlotKind, Resource, Terrain};
use crate::rivers::{Flow, RiverMaker};
use crate::rng::RandomSource;

use super::placement::Archetype;
use super::template::{Template, DENT};
use super::{DentLandmark, DentSite, MapRegions, RegionKind};

/// Chance to drop each pruned row or column on smaller worlds
const PRUNE_CHANCE: i32 = 80;
const SNOW_CHANCE: i32 = 66;
const TUNDRA_CHANCE: i32 = 60;
/// Chance for the second dent to lie on its side
const DOUBLE_SIDEWAYS_CHANCE: i32 = 25;
/// Chance for later dents to lie on their side
const LATER_SIDEWAYS_CHANCE: i32 = 66;
const BANANA_CHANCE: i32 = 33;

/// Landmark table, indexed by one draw
const LANDMARK_TERRAIN: [Terrain; 6] = [
    Terrain::Snow,
    Terrain::Tundra,
    Terrain::Tundra,
    Terrain::Marsh,
    Terrain::Grass,
    Terrain::Grass,
];
const LANDMARK_FLAT: [Resource; 6] = [
    Resource::Silver,
    Resource::Fur,
    Resource::Deer,
    Resource::Marble,
    Resource::Cow,
    Resource::Horse,
];
const LANDMARK_HILLS: [Option<Resource>; 5] = [
    Some(Resource::Silver),
    Some(Resource::Marble),
    Some(Resource::Gold),
    Some(Resource::Sheep),
    None,
];

/// Per-dent probabilities. One severity draw shifts all of them, so a dent
/// is either fierce or mild throughout.
#[derive(Clone, Copy, Debug)]
struct Severity {
    water_flat: i32,
    flat_hill: i32,
    hill_peak: i32,
}

impl Severity {
    fn new(var: i32) -> Self {
        Self {
            water_flat: 82 + var,
            flat_hill: 63 + var,
            hill_peak: 63 + var,
        }
    }

    /// Chance that two independent misses both happen.
    fn squared_miss(chance: i32) -> i32 {
        (100 - chance) * (100 - chance) / 100
    }
}

impl MapRegions {
    /// Build up to `count` dents.
    ///
    /// The first goes on one of the two largest land areas and is never
    /// sideways; on worlds larger than small it may get a second dent on a
    /// ring around it. Further dents are tried once per world size step
    /// above small, with falling chance, on land areas without a dent.
    pub fn build_dents<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        count: u32,
    ) -> u32 {
        let mut built = 0;

        if rng.choose(self.params.dent_chance as i32) && count > built {
            let candidates = self.anchor_candidates(grid, 2, &[], Archetype::Dent);
            if let Some(anchor) = rng.pick(&candidates) {
                let template = adjust_dent_template(grid.world_size(), false, rng);
                self.place_dent(grid, rng, rivers, &template, anchor, Some(false), false);
                built += 1;

                if grid.world_size() > WorldSize::Small
                    && count > 1
                    && rng.choose(self.params.double_dent_chance as i32)
                {
                    let rad = 12 + rng.draw_int(6) as i32;
                    let ring: Vec<(usize, usize)> = self
                        .double_dent_ring(grid, anchor.0, anchor.1, rad)
                        .into_iter()
                        .filter(|&(x, y)| self.accepts(grid, Archetype::Dent, x, y))
                        .collect();
                    match rng.pick(&ring) {
                        Some(second) => {
                            let template = adjust_dent_template(grid.world_size(), true, rng);
                            let sideways = rng.choose(DOUBLE_SIDEWAYS_CHANCE);
                            self.place_dent(grid, rng, rivers, &template, second, Some(sideways), true);
                            built += 1;
                        }
                        None => tracing::info!("no room for a double dent"),
                    }
                }
            } else {
                tracing::info!("no room for the first dent");
            }
        }

        let mut min_map = 2;
        while grid.world_size().index() > min_map && count > built {
            if rng.choose(self.params.dent_chance as i32 / (min_map - 1)) {
                let exclude: Vec<(usize, usize)> = self.dents.iter().map(|d| d.anchor).collect();
                let candidates = self.anchor_candidates(grid, 3, &exclude, Archetype::Dent);
                if candidates.is_empty() {
                    tracing::info!("no room for another dent");
                    break;
                }
                let template = adjust_dent_template(grid.world_size(), false, rng);
                if let Some(anchor) = rng.pick(&candidates) {
                    let sideways = rng.choose(LATER_SIDEWAYS_CHANCE);
                    self.place_dent(grid, rng, rivers, &template, anchor, Some(sideways), false);
                    built += 1;
                }
            }
            min_map += 1;
        }

        tracing::info!("{built} dents built");
        built
    }

    /// Carve a dent, draw its landmark and register it.
    #[allow(clippy::too_many_arguments)]
    fn place_dent<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        template: &Template,
        anchor: (usize, usize),
        sideways: Option<bool>,
        paired: bool,
    ) {
        let access = self.params.dent_access_chance;
        let name_plot = self.the_dent(grid, rng, rivers, template, anchor, sideways, access);
        let landmark = self.dent_landmark(grid, rng, name_plot, paired);
        if let Some(site) = self.dents.last_mut() {
            site.landmark = landmark;
        }
        let name = rng.pop(&mut self.dent_names).unwrap_or("Mountains");
        self.register(RegionKind::Dent, name, anchor, name_plot, paired);
    }

    /// Draw the landmark of a dent from the landmark table. Jungle turns to
    /// forest far from the equator; a paired dent may trade its flat
    /// resource for bananas in the tropics.
    fn dent_landmark<R: RandomSource>(
        &self,
        grid: &WorldGrid,
        rng: &mut R,
        name_plot: (usize, usize),
        paired: bool,
    ) -> DentLandmark {
        let pos = rng.draw_int(5) as usize;
        let terrain = LANDMARK_TERRAIN[pos];
        let mut flat_resource = LANDMARK_FLAT[pos];
        let hills_resource = LANDMARK_HILLS[pos];

        let mut feature = None;
        if matches!(terrain, Terrain::Marsh | Terrain::Grass) {
            feature = rng
                .choose_more(&[(25, Some(Feature::Jungle)), (66, Some(Feature::Forest)), (100, None)])
                .flatten();
        }
        let lat = grid.latitude(name_plot.0, name_plot.1);
        if feature == Some(Feature::Jungle) && lat > 60 {
            feature = Some(Feature::Forest);
        }
        if paired && feature == Some(Feature::Jungle) && lat < 45 && rng.choose(BANANA_CHANCE) {
            flat_resource = Resource::Banana;
        }
        DentLandmark {
            terrain,
            feature,
            flat_resource: Some(flat_resource),
            hills_resource,
        }
    }

    /// Raise one dent centred on `anchor` and return its landmark plot (the
    /// anchor). With `sideways` the rotation is forced so the footprint is
    /// taller than wide (`true`) or wider than tall (`false`).
    #[allow(clippy::too_many_arguments)]
    pub fn the_dent<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        rivers: &mut RiverMaker,
        template: &Template,
        anchor: (usize, usize),
        sideways: Option<bool>,
        access_chance: u32,
    ) -> (usize, usize) {
        let rot = rng.draw_int(4);
        let mut template = template.rotate(rot);
        if let Some(side) = sideways {
            if side != template.is_sideways() {
                template = template.rotate(1);
            }
        }
        let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);
        let ext = template.extents(ax, ay);
        let cells = template.placed(ax, ay);
        self.dents.push(DentSite {
            anchor,
            name_plot: anchor,
            sideways: template.is_sideways(),
            landmark: DentLandmark {
                terrain: Terrain::Grass,
                feature: None,
                flat_resource: None,
                hills_resource: None,
            },
        });
        tracing::info!(
            "building dent at ({},{}), {}x{}",
            anchor.0,
            anchor.1,
            ext.width(),
            ext.height()
        );

        // pass 1: plot kinds
        let sev = Severity::new(rng.draw_int(8) as i32);
        for &(fx, fy, symbol) in &cells {
            let Some(symbol) = symbol.filter(|&s| s > 0) else {
                continue;
            };
            let Some((x, y)) = grid.plot_xy(fx, fy) else {
                continue;
            };
            raise_plot(grid, rng, x, y, symbol, sev);
        }

        // pass 2: open plots walled in by peaks
        let chance = access_chance as i32 - 15 + rng.draw_int(30) as i32;
        if chance > 0 {
            for &(fx, fy, _) in &cells {
                let Some((x, y)) = grid.plot_xy(fx, fy) else {
                    continue;
                };
                let walls = grid.count_plot_neighbors(x, y, PlotKind::Peak, 1, false);
                let open = match walls {
                    8 => chance,
                    7 => chance / 2,
                    _ => continue,
                };
                let dir = Direction::from_index(rng.draw_int(8) as usize);
                if let Some((nx, ny)) = grid.neighbor(x, y, dir) {
                    if rng.choose(open) {
                        tracing::debug!("opening ({nx},{ny}) next to ({x},{y})");
                        grid.set_plot_kind(nx, ny, PlotKind::Hills);
                    }
                }
            }
        }

        // pass 3: terrain
        for &(fx, fy, symbol) in &cells {
            let Some((x, y)) = grid.plot_xy(fx, fy) else {
                continue;
            };
            if grid.plot(x, y).is_water() {
                continue;
            }
            let lat = grid.latitude(x, y);
            let terrain = grid.plot(x, y).terrain;
            match symbol {
                Some(1) => {
                    let t = if grid.plot(x, y).is_flat() { Terrain::Grass } else { Terrain::Snow };
                    grid.set_terrain(x, y, t);
                }
                Some(2) if terrain != Terrain::Snow => {
                    let chance = if lat < 25 { 100 - SNOW_CHANCE } else { SNOW_CHANCE };
                    let t = if rng.choose(chance) { Terrain::Snow } else { Terrain::Tundra };
                    grid.set_terrain(x, y, t);
                }
                Some(3) if !matches!(terrain, Terrain::Snow | Terrain::Tundra) => {
                    let chance = if lat < 30 { 100 - TUNDRA_CHANCE } else { TUNDRA_CHANCE };
                    if rng.choose(chance) {
                        grid.set_terrain(x, y, Terrain::Tundra);
                    } else if terrain == Terrain::Desert {
                        grid.set_terrain(x, y, Terrain::Plains);
                    }
                }
                _ => {}
            }
            let plot = grid.plot(x, y);
            if plot.is_hills() && plot.terrain == Terrain::Marsh {
                grid.set_terrain(x, y, Terrain::Grass);
            }
        }

        // pass 4: short rivers from the central columns, flowing outward
        let max_rivers = self.params.dent_max_rivers;
        let river_chance = self.params.dent_river_chance as i32;
        let mut attempts = 0;
        let mut skip = false;
        for &(fx, fy, _) in &cells {
            if skip {
                skip = false;
                continue;
            }
            if attempts >= max_rivers {
                break;
            }
            let (rdx, rdy) = (fx - ax, fy - ay);
            if rdx != 0 && rdx != -1 {
                continue;
            }
            let Some((x, y)) = grid.plot_xy(fx, fy) else {
                continue;
            };
            if grid.has_water_at_vertex(x, y) || !rng.choose(river_chance) {
                continue;
            }
            let dir = outward_direction(rng, rdx, rdy);
            if let Some(river) = rivers.build_river(grid, rng, x, y, Flow::Down, Some(dir)) {
                self.rivers.push(river);
            }
            skip = true;
            attempts += 1;
        }

        anchor
    }
}

/// First edge for a dent river starting at (rdx, rdy) from the anchor:
/// east from the anchor column, west from the one left of it, and south or
/// north depending on the row.
fn outward_direction<R: RandomSource>(rng: &mut R, rdx: i32, rdy: i32) -> CardinalDirection {
    let side = if rdx == 0 {
        CardinalDirection::East
    } else {
        CardinalDirection::West
    };
    if rdy == -1 {
        return side;
    }
    let vertical = if rdy >= 0 {
        CardinalDirection::South
    } else {
        CardinalDirection::North
    };
    if rng.choose(50) {
        side
    } else {
        vertical
    }
}

/// Percent chance with 100 and above taken without a draw.
fn roll<R: RandomSource>(rng: &mut R, chance: i32) -> bool {
    chance >= 100 || rng.choose(chance)
}

/// Pass-1 plot change for one dent cell: water may become land, then flat
/// land hills, then hills a peak, each with the symbol's chance.
fn raise_plot<R: RandomSource>(grid: &mut WorldGrid, rng: &mut R, x: usize, y: usize, symbol: u8, sev: Severity) {
    let (water, flat, hills) = match symbol {
        4 => (sev.water_flat, sev.flat_hill, 100 - sev.hill_peak),
        3 => (
            100 - Severity::squared_miss(sev.water_flat),
            sev.flat_hill,
            sev.hill_peak,
        ),
        2 => (100, 100 - Severity::squared_miss(sev.flat_hill), sev.hill_peak),
        1 => (
            100,
            100 - Severity::squared_miss(sev.flat_hill),
            100 - Severity::squared_miss(sev.hill_peak),
        ),
        _ => return,
    };
    let steps = [
        (PlotKind::Ocean, PlotKind::Land, water),
        (PlotKind::Land, PlotKind::Hills, flat),
        (PlotKind::Hills, PlotKind::Peak, hills),
    ];
    for (from, to, chance) in steps {
        if grid.plot(x, y).kind == from && roll(rng, chance) {
            grid.set_plot_kind(x, y, to);
        }
    }
}

/// Dent template for a world size, with outer rows and columns dropped on
/// smaller worlds. With `random` the size is drawn instead.
pub fn adjust_dent_template<R: RandomSource>(size: WorldSize, random: bool, rng: &mut R) -> Template {
    let siz = if random {
        rng.draw_int(7) as i32
    } else {
        size.index()
    };
    let mut template = Template::from_rows(&DENT);
    if siz < 5 && rng.choose(PRUNE_CHANCE) {
        template = template.without_row(5);
    }
    if siz < 4 && rng.choose(PRUNE_CHANCE) {
        template = template.without_row(3);
    }
    if siz < 3 && rng.choose(PRUNE_CHANCE) {
        template = template.without_column(8);
    }
    if siz < 2 && rng.choose(PRUNE_CHANCE) {
        template = template.without_column(6);
    }
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::rng::testing::Scripted;

    fn plain(w: usize, h: usize) -> WorldGrid {
        let mut rows = Vec::new();
        for y in 0..h {
            let row: String = (0..w)
                .map(|x| if x > 0 && x < w - 1 && y > 0 && y < h - 1 { '.' } else { '~' })
                .collect();
            rows.push(row);
        }
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        WorldGrid::from_ascii(&refs)
    }

    #[test]
    fn test_dent_raises_mountains() {
        let mut grid = plain(30, 30);
        grid.recalculate_areas();
        let mut regions = MapRegions::default();
        let mut rivers = RiverMaker::default();
        let mut rng = seeded(3);
        let template = Template::from_rows(&DENT);
        let name = regions.the_dent(&mut grid, &mut rng, &mut rivers, &template, (15, 15), None, 66);
        assert_eq!(name, (15, 15));
        let peaks = grid.iter().filter(|(_, _, p)| p.is_peak()).count();
        let hills = grid.iter().filter(|(_, _, p)| p.is_hills()).count();
        assert!(peaks > 10);
        assert!(hills > 0);
        assert!(grid
            .iter()
            .all(|(_, _, p)| !(p.is_hills() && p.terrain == Terrain::Marsh)));
    }

    #[test]
    fn test_sideways_forcing() {
        let template = Template::from_rows(&DENT);
        for seed in 0..4 {
            for side in [true, false] {
                let mut grid = plain(30, 30);
                grid.recalculate_areas();
                let mut regions = MapRegions::default();
                let mut rivers = RiverMaker::default();
                let mut rng = seeded(seed);
                regions.the_dent(&mut grid, &mut rng, &mut rivers, &template, (15, 15), Some(side), 66);
                assert_eq!(regions.dents()[0].sideways, side);
            }
        }
    }

    #[test]
    fn test_dent_rivers_are_limited() {
        for seed in 0..10 {
            let mut grid = plain(30, 30);
            grid.recalculate_areas();
            let mut regions = MapRegions::default();
            let mut rivers = RiverMaker::default();
            let mut rng = seeded(seed);
            let template = Template::from_rows(&DENT);
            regions.the_dent(&mut grid, &mut rng, &mut rivers, &template, (15, 15), None, 66);
            assert!(regions.rivers().len() <= 3);
            for river in regions.rivers() {
                assert_eq!(river.flow, Flow::Down);
            }
        }
    }

    #[test]
    fn test_template_pruning_by_size() {
        // every prune chance hits with a zero draw
        let mut rng = Scripted::new(&[0]);
        let duel = adjust_dent_template(WorldSize::Duel, false, &mut rng);
        assert_eq!((duel.rows(), duel.cols()), (8, 12));
        let huge = adjust_dent_template(WorldSize::Huge, false, &mut rng);
        assert_eq!((huge.rows(), huge.cols()), (10, 14));
        let large = adjust_dent_template(WorldSize::Large, false, &mut rng);
        assert_eq!((large.rows(), large.cols()), (9, 14));
    }

    #[test]
    fn test_outward_direction() {
        let mut rng = Scripted::new(&[99, 99]);
        assert_eq!(outward_direction(&mut rng, 0, 3), CardinalDirection::South);
        assert_eq!(outward_direction(&mut rng, -1, -4), CardinalDirection::North);
        assert_eq!(outward_direction(&mut rng, -1, -1), CardinalDirection::West);
        let mut rng = Scripted::new(&[0]);
        assert_eq!(outward_direction(&mut rng, 0, 0), CardinalDirection::East);
    }

    #[test]
    fn test_build_dents_on_tiny_world() {
        let mut grid = plain(40, 40).with_world_size(WorldSize::Tiny);
        let mut regions = MapRegions::default();
        let mut rivers = RiverMaker::default();
        let built = regions.build_dents(&mut grid, &mut seeded(8), &mut rivers, 3);
        // tiny worlds only get the first dent
        assert!(built <= 1);
        assert_eq!(regions.dents().len(), built as usize);
        if built == 1 {
            assert_eq!(regions.records()[0].kind, RegionKind::Dent);
            assert!(!regions.dents()[0].sideways);
        }
    }
}
