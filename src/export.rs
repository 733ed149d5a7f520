//! Exports of a finished grid: a JSON snapshot and a PNG preview.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{WorldGrid, WorldSize};
use crate::plot::{Feature, Plot, PlotKind, Terrain};
use crate::regions::RegionRecord;
use crate::rivers::River;

/// Serializable copy of a grid and what was built on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub wrap_x: bool,
    pub wrap_y: bool,
    pub world_size: WorldSize,
    pub seed: Option<u64>,
    /// Row-major
    pub plots: Vec<Plot>,
    pub regions: Vec<RegionRecord>,
    pub rivers: Vec<River>,
}

impl GridSnapshot {
    pub fn capture(grid: &WorldGrid, seed: Option<u64>, regions: &[RegionRecord], rivers: &[River]) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            wrap_x: grid.wrap_x(),
            wrap_y: grid.wrap_y(),
            world_size: grid.world_size(),
            seed,
            plots: grid.iter().map(|(_, _, p)| p.clone()).collect(),
            regions: regions.to_vec(),
            rivers: rivers.to_vec(),
        }
    }
}

pub fn write_json(snapshot: &GridSnapshot, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

pub fn read_json(path: impl AsRef<Path>) -> Result<GridSnapshot> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

const RIVER_COLOR: [u8; 3] = [30, 60, 200];

fn plot_color(plot: &Plot) -> [u8; 3] {
    let base = match plot.terrain {
        Terrain::Ocean => [20, 40, 110],
        Terrain::Coast => [50, 90, 160],
        Terrain::Grass => [80, 150, 60],
        Terrain::Plains => [160, 160, 80],
        Terrain::Desert => [220, 200, 130],
        Terrain::Tundra => [140, 140, 120],
        Terrain::Snow => [235, 235, 240],
        Terrain::Marsh => [70, 110, 90],
    };
    let base = match plot.feature {
        Some(Feature::Forest) => [base[0] / 2, base[1] * 3 / 4, base[2] / 2],
        Some(Feature::Jungle) => [20, 90, 30],
        Some(Feature::Ice) => [200, 220, 240],
        _ => base,
    };
    match plot.kind {
        PlotKind::Hills => base.map(|c| (c as u16 * 3 / 4) as u8),
        PlotKind::Peak => [120, 100, 90],
        _ => base,
    }
}

/// Render each plot as a `scale`-pixel square. River edges are drawn along
/// the owning plot's south or east side.
pub fn render(grid: &WorldGrid, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(grid.width() as u32 * scale, grid.height() as u32 * scale);

    for (x, y, plot) in grid.iter() {
        let color = plot_color(plot);
        let (px, py) = (x as u32 * scale, y as u32 * scale);
        for dy in 0..scale {
            for dx in 0..scale {
                let on_south = dy == scale - 1 && plot.is_n_of_river();
                let on_east = dx == scale - 1 && plot.is_w_of_river();
                let c = if on_south || on_east { RIVER_COLOR } else { color };
                img.put_pixel(px + dx, py + dy, Rgb(c));
            }
        }
    }
    img
}

pub fn write_png(grid: &WorldGrid, path: impl AsRef<Path>, scale: u32) -> Result<()> {
    render(grid, scale).save(path)?;
    Ok(())
}
