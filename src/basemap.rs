//! Standalone base map: a typed grid from layered Perlin noise, so the
//! sculpting pipeline can run without an external map generator.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::collab::TerrainGenerator;
use crate::grid::WorldGrid;
use crate::plot::PlotKind;
use crate::rng::RandomSource;
use crate::tilemap::Tilemap;

/// Parameters for base map generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMapParams {
    /// Base frequency for noise (lower = larger continents)
    pub frequency: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Share of plots below sea level (0.0-1.0)
    pub water_share: f32,
    /// Share of land plots raised to hills or peaks
    pub hills_share: f32,
    /// Share of land plots raised to peaks
    pub peak_share: f32,
    /// How strongly non-wrapping edges are pushed under water
    pub edge_falloff: f32,
}

impl Default for BaseMapParams {
    fn default() -> Self {
        Self {
            frequency: 0.06,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            water_share: 0.6,
            hills_share: 0.25,
            peak_share: 0.06,
            edge_falloff: 0.6,
        }
    }
}

/// Multi-octave fBm, normalized to roughly -1..1.
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

/// Distance to the nearest non-wrapping edge as a fraction of the half extent
/// (0 at the edge, 1 in the middle).
fn edge_closeness(pos: usize, len: usize) -> f32 {
    if len < 2 {
        return 1.0;
    }
    let half = (len - 1) as f32 / 2.0;
    1.0 - ((pos as f32 - half).abs() / half)
}

/// Elevation field for the grid's dimensions.
pub fn elevation_map(grid: &WorldGrid, seed: u32, params: &BaseMapParams) -> Tilemap<f32> {
    let noise = Perlin::new(seed);
    let (w, h) = (grid.width(), grid.height());
    let mut elevation = Tilemap::new_with(w, h, 0.0f32);

    for y in 0..h {
        for x in 0..w {
            let mut e = fbm(
                &noise,
                x as f64 * params.frequency,
                y as f64 * params.frequency,
                params.octaves,
                params.persistence,
                params.lacunarity,
            ) as f32;
            if !grid.wrap_x() {
                e -= params.edge_falloff * (1.0 - edge_closeness(x, w)).powi(3);
            }
            if !grid.wrap_y() {
                e -= params.edge_falloff * (1.0 - edge_closeness(y, h)).powi(3);
            }
            elevation.set(x, y, e);
        }
    }
    elevation
}

/// Value below which `share` of `values` lie.
fn quantile(values: &[f32], share: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let i = ((sorted.len() as f32 * share.clamp(0.0, 1.0)) as usize).min(sorted.len() - 1);
    sorted[i]
}

/// Turn `grid` into a base map: plot kinds from noise quantiles, then terrain
/// and features from `terrain`. Areas are recalculated at the end.
pub fn generate_base_map<R: RandomSource, G: TerrainGenerator>(
    grid: &mut WorldGrid,
    rng: &mut R,
    terrain: &G,
    seed: u32,
    params: &BaseMapParams,
) {
    let elevation = elevation_map(grid, seed, params);
    let all: Vec<f32> = elevation.iter().map(|(_, _, &e)| e).collect();
    let sea_level = quantile(&all, params.water_share);
    let land: Vec<f32> = all.iter().copied().filter(|&e| e > sea_level).collect();
    let hills_level = quantile(&land, 1.0 - params.hills_share);
    let peak_level = quantile(&land, 1.0 - params.peak_share);

    for (x, y, &e) in elevation.iter() {
        let kind = if e <= sea_level {
            PlotKind::Ocean
        } else if e >= peak_level {
            PlotKind::Peak
        } else if e >= hills_level {
            PlotKind::Hills
        } else {
            PlotKind::Land
        };
        grid.set_plot_kind(x, y, kind);
    }

    for index in 0..grid.num_plots() {
        let (x, y) = grid.coord_of(index);
        let t = terrain.terrain_for(grid, x, y);
        grid.set_terrain(x, y, t);
        let feature = terrain.features_at(grid, x, y, rng);
        grid.set_feature(x, y, feature);
    }

    grid.recalculate_areas();
    tracing::info!(
        "base map {}x{}: {} land plots, {} areas",
        grid.width(),
        grid.height(),
        land.len(),
        grid.areas().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::LatitudeTerrain;
    use crate::rng::seeded;

    fn base(seed: u64) -> WorldGrid {
        let mut grid = WorldGrid::new(48, 32).with_wrap(true, false);
        generate_base_map(
            &mut grid,
            &mut seeded(seed),
            &LatitudeTerrain::default(),
            seed as u32,
            &BaseMapParams::default(),
        );
        grid
    }

    #[test]
    fn test_water_share_is_respected() {
        let grid = base(3);
        let water = grid.iter().filter(|(_, _, p)| p.is_water()).count();
        let share = water as f32 / grid.num_plots() as f32;
        assert!((0.55..=0.65).contains(&share), "water share {share}");
    }

    #[test]
    fn test_base_map_is_reproducible() {
        assert_eq!(base(11).to_ascii(), base(11).to_ascii());
    }

    #[test]
    fn test_edge_closeness() {
        assert_eq!(edge_closeness(0, 11), 0.0);
        assert_eq!(edge_closeness(10, 11), 0.0);
        assert_eq!(edge_closeness(5, 11), 1.0);
        assert_eq!(edge_closeness(0, 1), 1.0);
    }

    #[test]
    fn test_quantile() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.5), 3.0);
        assert_eq!(quantile(&values, 1.0), 4.0);
        assert_eq!(quantile(&[], 0.5), 0.0);
    }
}
