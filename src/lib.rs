//! Region and river sculpting for tile-based world maps
//!
//! Takes an already-typed grid (ocean, flat land, hills, peaks) and carves
//! named regions into it (bogs, mountain dents, the Lost Isle), then grows a
//! river network along plot edges.

pub mod areas;
pub mod basemap;
pub mod collab;
pub mod config;
pub mod direction;
pub mod error;
pub mod export;
pub mod grid;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod regions;
pub mod rivers;
pub mod rng;
pub mod tilemap;

pub use config::SculptConfig;
pub use error::{Result, SculptError};
pub use grid::{WorldGrid, WorldSize};
pub use pipeline::{sculpt_world, sculpt_world_with, SculptReport};
pub use rng::{seeded, RandomSource};
