//! Sculpting parameters and configuration
//!
//! Every tunable chance and distance lives here with its default. A
//! [`SculptConfig`] can be loaded from JSON; missing fields take defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SculptError};

/// Adjacency rule used when grouping plots into areas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Orthogonal neighbours only
    Four,
    /// Orthogonal and diagonal neighbours
    #[default]
    Eight,
}

/// Grid topology parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Adjacency rule for area discovery
    pub connectivity: Connectivity,
    /// Water areas with at most this many tiles are lakes
    pub lake_max_tiles: usize,
    /// Latitude of the northern edge (degrees)
    pub top_latitude: i32,
    /// Latitude of the southern edge (degrees)
    pub bottom_latitude: i32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            lake_max_tiles: 9,
            top_latitude: 90,
            bottom_latitude: -90,
        }
    }
}

/// River network generator parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverParams {
    /// Chance (percent) to replace the current best direction with a better one.
    /// Below 100 keeps rivers from running perfectly straight.
    pub best_route_chance: u32,
    /// Chance (percent) to take a direction leading off a non-wrapping edge
    pub edge_chance: u32,
    /// Turn the terminal flat plot of an up-flow river into hills
    pub make_source_hill: bool,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            best_route_chance: 90,
            edge_chance: 80,
            make_source_hill: true,
        }
    }
}

/// Inclusive latitude band in degrees (0 = equator, 90 = pole)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatitudeRange {
    pub min: i32,
    pub max: i32,
}

impl LatitudeRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.clamp(0, 90),
            max: max.clamp(0, 90),
        }
    }

    pub fn contains(&self, latitude: i32) -> bool {
        self.min <= latitude && latitude <= self.max
    }
}

/// Latitude bands where bogs may form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshZones {
    /// Tropical swamps
    pub hot: LatitudeRange,
    /// Temperate fens
    pub cold: LatitudeRange,
}

impl Default for MarshZones {
    fn default() -> Self {
        Self {
            hot: LatitudeRange::new(0, 18),
            cold: LatitudeRange::new(45, 63),
        }
    }
}

impl MarshZones {
    pub fn contains(&self, latitude: i32) -> bool {
        self.hot.contains(latitude) || self.cold.contains(latitude)
    }
}

/// Region template engine parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Base spacing between region anchors; world size is added on top
    pub region_dist: i32,
    /// Anchors keep this distance from non-wrapping edges
    pub edge_margin: i32,
    /// Lost Isle centres keep this distance from non-wrapping edges
    pub isle_edge_margin: i32,
    /// Smallest land area considered for bogs and dents
    pub min_area_tiles: usize,
    /// Chance (percent) to build the Big Bog
    pub big_bog_chance: u32,
    /// Chance (percent) for each Small Bog
    pub small_bog_chance: u32,
    /// Chance (percent) to build the first dent
    pub dent_chance: u32,
    /// Chance (percent) for a second dent next to the first
    pub double_dent_chance: u32,
    /// Base chance (percent) to open a plot walled in by peaks
    pub dent_access_chance: u32,
    /// Chance (percent) for each of the dent river starts
    pub dent_river_chance: u32,
    /// Most rivers seeded from one dent
    pub dent_max_rivers: usize,
    /// Chance (percent) to build the Lost Isle
    pub lost_isle_chance: u32,
    /// Radius of empty ocean needed around the Lost Isle
    pub lost_isle_min_dist: i32,
    /// Plot distances searched for bog rim rivers
    pub bog_rim_distances: Vec<i32>,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            region_dist: 15,
            edge_margin: 3,
            isle_edge_margin: 4,
            min_area_tiles: 30,
            big_bog_chance: 75,
            small_bog_chance: 66,
            dent_chance: 75,
            double_dent_chance: 33,
            dent_access_chance: 66,
            dent_river_chance: 30,
            dent_max_rivers: 3,
            lost_isle_chance: 33,
            lost_isle_min_dist: 7,
            bog_rim_distances: vec![5, 4, 3],
        }
    }
}

/// Which steps the world-assembly pipeline runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub lost_isle: bool,
    /// The Lost Isle was settled by an advanced people
    pub aliens: bool,
    /// Most bogs to build
    pub bogs: u32,
    /// Most dents to build
    pub dents: u32,
    pub lake_rivers: bool,
    /// Chance (percent) that a chosen lake outlet becomes a river
    pub lake_river_chance: u32,
    /// Desired rivers per lake
    pub lake_river_count: usize,
    /// Lakes smaller than this (jittered) get no rivers
    pub lake_min_tiles: usize,
    pub island_rivers: bool,
    pub island_min_tiles: usize,
    pub island_max_tiles: usize,
    pub region_extras: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            lost_isle: true,
            aliens: false,
            bogs: 3,
            dents: 3,
            lake_rivers: true,
            lake_river_chance: 66,
            lake_river_count: 1,
            lake_min_tiles: 1,
            island_rivers: true,
            island_min_tiles: 6,
            island_max_tiles: 50,
            region_extras: true,
        }
    }
}

/// Complete sculpting configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptConfig {
    pub grid: GridParams,
    pub rivers: RiverParams,
    pub regions: RegionParams,
    pub marsh: MarshZones,
    pub pipeline: PipelineParams,
}

impl SculptConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SculptConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generators cannot work with.
    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("rivers.best_route_chance", self.rivers.best_route_chance),
            ("rivers.edge_chance", self.rivers.edge_chance),
            ("regions.big_bog_chance", self.regions.big_bog_chance),
            ("regions.small_bog_chance", self.regions.small_bog_chance),
            ("regions.dent_chance", self.regions.dent_chance),
            ("regions.double_dent_chance", self.regions.double_dent_chance),
            ("regions.dent_access_chance", self.regions.dent_access_chance),
            ("regions.dent_river_chance", self.regions.dent_river_chance),
            ("regions.lost_isle_chance", self.regions.lost_isle_chance),
            ("pipeline.lake_river_chance", self.pipeline.lake_river_chance),
        ];
        for (name, value) in chances {
            if value > 100 {
                return Err(SculptError::InvalidConfig(format!(
                    "{name} must be a percentage, got {value}"
                )));
            }
        }
        if self.grid.top_latitude == self.grid.bottom_latitude {
            return Err(SculptError::InvalidConfig(
                "grid latitude range is empty".to_string(),
            ));
        }
        if self.regions.edge_margin < 0 || self.regions.isle_edge_margin < 0 {
            return Err(SculptError::InvalidConfig(
                "edge margins must not be negative".to_string(),
            ));
        }
        if self.regions.bog_rim_distances.iter().any(|&d| d <= 0) {
            return Err(SculptError::InvalidConfig(
                "bog rim distances must be positive".to_string(),
            ));
        }
        if self.pipeline.island_min_tiles > self.pipeline.island_max_tiles {
            return Err(SculptError::InvalidConfig(
                "island_min_tiles exceeds island_max_tiles".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SculptConfig::from_json_str(r#"{ "rivers": { "edge_chance": 50 } }"#).unwrap();
        assert_eq!(config.rivers.edge_chance, 50);
        assert_eq!(config.rivers.best_route_chance, 90);
        assert_eq!(config.regions, RegionParams::default());
    }

    #[test]
    fn test_rejects_bad_percentages() {
        let err = SculptConfig::from_json_str(r#"{ "regions": { "dent_chance": 150 } }"#);
        assert!(matches!(err, Err(SculptError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let config = SculptConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SculptConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_marsh_zones() {
        let zones = MarshZones::default();
        assert!(zones.contains(10));
        assert!(zones.contains(50));
        assert!(!zones.contains(30));
        assert!(!zones.contains(80));
    }
}
