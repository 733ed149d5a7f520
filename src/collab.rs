//! Collaborator capabilities the sculptors call out to: terrain/feature
//! generation for freshly created land and resource placement.

use crate::grid::WorldGrid;
use crate::plot::{Feature, PlotKind, Resource, Terrain};
use crate::rng::RandomSource;

/// Assigns terrain and features to plots whose kind was just rewritten.
pub trait TerrainGenerator {
    fn terrain_for(&self, grid: &WorldGrid, x: usize, y: usize) -> Terrain;

    fn features_at<R: RandomSource>(
        &self,
        grid: &WorldGrid,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> Option<Feature>;
}

/// Terrain bands by latitude, features by terrain.
#[derive(Clone, Debug)]
pub struct LatitudeTerrain {
    pub snow_latitude: i32,
    pub tundra_latitude: i32,
    pub desert_band: (i32, i32),
    pub ice_latitude: i32,
}

impl Default for LatitudeTerrain {
    fn default() -> Self {
        Self {
            snow_latitude: 75,
            tundra_latitude: 60,
            desert_band: (20, 30),
            ice_latitude: 80,
        }
    }
}

impl TerrainGenerator for LatitudeTerrain {
    fn terrain_for(&self, grid: &WorldGrid, x: usize, y: usize) -> Terrain {
        let plot = grid.plot(x, y);
        if plot.is_water() {
            let near_land = grid
                .neighbors_8(x, y)
                .into_iter()
                .any(|(nx, ny)| !grid.plot(nx, ny).is_water());
            return if near_land { Terrain::Coast } else { Terrain::Ocean };
        }

        let lat = grid.latitude(x, y);
        if lat >= self.snow_latitude {
            Terrain::Snow
        } else if lat >= self.tundra_latitude {
            Terrain::Tundra
        } else if lat >= 45 {
            Terrain::Grass
        } else if lat > self.desert_band.1 {
            Terrain::Plains
        } else if lat >= self.desert_band.0 {
            Terrain::Desert
        } else {
            Terrain::Grass
        }
    }

    fn features_at<R: RandomSource>(
        &self,
        grid: &WorldGrid,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> Option<Feature> {
        let plot = grid.plot(x, y);
        let lat = grid.latitude(x, y);
        match (plot.kind, plot.terrain) {
            (PlotKind::Ocean, _) if lat >= self.ice_latitude => {
                rng.choose(50).then_some(Feature::Ice)
            }
            (PlotKind::Ocean, _) | (PlotKind::Peak, _) => None,
            (_, Terrain::Grass) if lat < 25 => rng.choose(40).then_some(Feature::Jungle),
            (_, Terrain::Grass | Terrain::Plains | Terrain::Tundra) if lat >= 35 => {
                rng.choose(35).then_some(Feature::Forest)
            }
            (PlotKind::Land, Terrain::Desert) => rng.choose(5).then_some(Feature::Oasis),
            _ => None,
        }
    }
}

/// Validity check and placement of resource markers.
pub trait ResourcePlacer {
    fn is_valid(&self, grid: &WorldGrid, resource: Resource, x: usize, y: usize) -> bool;

    fn place(&self, grid: &mut WorldGrid, x: usize, y: usize, resource: Resource) {
        grid.set_resource(x, y, Some(resource));
    }
}

/// Simple terrain-driven resource rules.
#[derive(Clone, Debug, Default)]
pub struct BasicResources;

impl ResourcePlacer for BasicResources {
    fn is_valid(&self, grid: &WorldGrid, resource: Resource, x: usize, y: usize) -> bool {
        let plot = grid.plot(x, y);
        if plot.resource.is_some() {
            return false;
        }
        if resource.is_aquatic() {
            return plot.is_water();
        }
        if plot.is_water() || plot.is_peak() {
            return false;
        }
        let forest = plot.feature == Some(Feature::Forest);
        match resource {
            Resource::Banana => plot.feature == Some(Feature::Jungle),
            Resource::Cow => plot.is_flat() && matches!(plot.terrain, Terrain::Grass | Terrain::Plains),
            Resource::Horse => matches!(plot.terrain, Terrain::Grass | Terrain::Plains | Terrain::Tundra),
            Resource::Sheep => {
                plot.is_hills() || matches!(plot.terrain, Terrain::Grass | Terrain::Plains)
            }
            Resource::Fur => forest || matches!(plot.terrain, Terrain::Tundra | Terrain::Snow),
            Resource::Deer => forest || plot.terrain == Terrain::Tundra,
            Resource::Oil => plot.feature != Some(Feature::Jungle),
            Resource::Marble => plot.terrain != Terrain::Marsh,
            _ => true,
        }
    }
}
