//! Region template engine
//!
//! Carves named regions into a typed grid by stamping rotated templates:
//! - Bogs: marshy lowland around an optional lake, drained by rivers
//! - Dents: mountain ranges with a landmark plot and short outflowing rivers
//! - The Lost Isle: a small island raised from open ocean
//!
//! Every placed region is appended to a ledger of anchors that later
//! placements must keep their distance from.

pub mod bog;
pub mod dent;
pub mod extras;
pub mod lost_isle;
pub mod placement;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::config::{MarshZones, RegionParams};
use crate::plot::{Feature, Resource, Terrain};
use crate::rivers::River;

pub use template::{Extents, Template};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Bog,
    Dent,
    LostIsle,
}

/// One entry of the placement record, in build order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub kind: RegionKind,
    pub name: String,
    pub anchor: (usize, usize),
    /// Plot that carries the region's landmark
    pub name_plot: (usize, usize),
    /// Built next to an earlier region on purpose; exempt from spacing
    pub paired: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BogSite {
    pub anchor: (usize, usize),
    pub name_plot: (usize, usize),
    pub big: bool,
    pub lake: bool,
}

/// What a dent's landmark plot turns into once the map is finished.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DentLandmark {
    pub terrain: Terrain,
    pub feature: Option<Feature>,
    pub flat_resource: Option<Resource>,
    pub hills_resource: Option<Resource>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DentSite {
    pub anchor: (usize, usize),
    pub name_plot: (usize, usize),
    pub sideways: bool,
    pub landmark: DentLandmark,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LostIsleSite {
    pub centre: (usize, usize),
    /// Plots raised from the ocean
    pub stamp: Vec<(usize, usize)>,
    pub aliens: bool,
    /// Coastal plot chosen for the old settlement
    pub site: Option<(usize, usize)>,
}

/// Names for mountain ranges, handed out without repetition
const DENT_NAMES: [&str; 6] = [
    "Big Brother Range",
    "Big Dent Highlands",
    "Great Spinal Mountains",
    "Celestial Belt",
    "Howling Barrier",
    "Wizard Mountains",
];

/// Session state of the region builders: parameters, the anchor ledger and
/// everything built so far.
#[derive(Clone, Debug)]
pub struct MapRegions {
    pub params: RegionParams,
    pub marsh: MarshZones,
    ledger: Vec<(usize, usize)>,
    records: Vec<RegionRecord>,
    bogs: Vec<BogSite>,
    dents: Vec<DentSite>,
    lost_isles: Vec<LostIsleSite>,
    rivers: Vec<River>,
    dent_names: Vec<&'static str>,
}

impl Default for MapRegions {
    fn default() -> Self {
        Self::new(RegionParams::default(), MarshZones::default())
    }
}

impl MapRegions {
    pub fn new(params: RegionParams, marsh: MarshZones) -> Self {
        Self {
            params,
            marsh,
            ledger: Vec::new(),
            records: Vec::new(),
            bogs: Vec::new(),
            dents: Vec::new(),
            lost_isles: Vec::new(),
            rivers: Vec::new(),
            dent_names: DENT_NAMES.to_vec(),
        }
    }

    /// Anchors of all placed regions, in placement order.
    pub fn ledger(&self) -> &[(usize, usize)] {
        &self.ledger
    }

    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn bogs(&self) -> &[BogSite] {
        &self.bogs
    }

    pub fn dents(&self) -> &[DentSite] {
        &self.dents
    }

    pub fn lost_isles(&self) -> &[LostIsleSite] {
        &self.lost_isles
    }

    /// Rivers grown by region builders and extras.
    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    fn register(&mut self, kind: RegionKind, name: &str, anchor: (usize, usize), name_plot: (usize, usize), paired: bool) {
        self.ledger.push(anchor);
        self.records.push(RegionRecord {
            kind,
            name: name.to_string(),
            anchor,
            name_plot,
            paired,
        });
        tracing::info!(
            "{name} placed at ({},{}), landmark at ({},{})",
            anchor.0,
            anchor.1,
            name_plot.0,
            name_plot.1
        );
    }
}
