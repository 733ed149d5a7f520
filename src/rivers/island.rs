//! Rivers for small islands that have none.

use crate::grid::WorldGrid;
use crate::plot::{AreaId, PlotKind};
use crate::rng::RandomSource;

use super::{Flow, River, RiverMaker, RouteMode};

/// Chance to fall back to flat inland vertices when an island has no hills
const FLAT_SOURCE_CHANCE: i32 = 66;

impl RiverMaker {
    /// Give each riverless island of roughly `min..=max` tiles one or two
    /// down-flow rivers starting at inland peak or hill vertices.
    /// With `area` only that island is considered.
    pub fn island_rivers<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        min: usize,
        max: usize,
        area: Option<AreaId>,
    ) -> Vec<River> {
        grid.recalculate_areas();
        let islands: Vec<(AreaId, usize)> = grid
            .areas()
            .iter()
            .filter(|a| area.map_or(true, |id| id == a.id))
            .filter(|a| !a.is_water)
            .map(|a| (a.id, a.tile_count()))
            .collect();

        let mut rivers = Vec::new();
        for (id, size) in islands {
            let size = size as i64;
            if size < min as i64 + rng.draw_int(3) as i64 - 1 {
                continue;
            }
            if size > max as i64 + rng.draw_int(5) as i64 - 2 {
                continue;
            }
            if grid.river_edges_in(id) > 0 {
                continue;
            }

            let mut sources = Vec::new();
            let mut flat = Vec::new();
            for (x, y) in grid.coords_where(|p| p.area == Some(id)) {
                if grid.has_water_at_vertex(x, y) {
                    continue;
                }
                if grid.has_kind_at_vertex(x, y, PlotKind::Peak) {
                    sources.push((x, y));
                    sources.push((x, y));
                } else if grid.has_kind_at_vertex(x, y, PlotKind::Hills) {
                    sources.push((x, y));
                } else {
                    flat.push((x, y));
                }
            }
            if sources.is_empty() {
                tracing::debug!("island {} has no inland hills", id.0);
                if rng.choose(FLAT_SOURCE_CHANCE) {
                    sources = flat;
                }
            }
            if sources.is_empty() {
                continue;
            }

            if let Some(river) = self.island_river(grid, rng, &mut sources) {
                rivers.push(river);
            }
            // a second river is likelier the more sources there are
            if rng.choose(sources.len() as i32 - 5) {
                if let Some(river) = self.island_river(grid, rng, &mut sources) {
                    rivers.push(river);
                }
            }
        }
        if rivers.is_empty() {
            tracing::debug!("no island rivers built");
        }
        rivers
    }

    fn island_river<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        sources: &mut Vec<(usize, usize)>,
    ) -> Option<River> {
        let (x, y) = rng.pop(sources)?;
        let dir = self.best_flow_dir(grid, rng, x, y, Flow::Down, RouteMode::Long, &[])?;
        self.build_river(grid, rng, x, y, Flow::Down, Some(dir))
    }
}
