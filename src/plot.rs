//! Plot cell types: plot kind, terrain, feature, resource and river state.

use serde::{Deserialize, Serialize};

use crate::direction::CardinalDirection;

/// Elevation class of a plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotKind {
    #[default]
    Ocean,
    Land,
    Hills,
    Peak,
}

impl PlotKind {
    pub fn is_water(self) -> bool {
        self == PlotKind::Ocean
    }

    /// Flat land (neither hills nor peak).
    pub fn is_flat(self) -> bool {
        self == PlotKind::Land
    }

    pub fn symbol(self) -> char {
        match self {
            PlotKind::Ocean => '~',
            PlotKind::Land => '.',
            PlotKind::Hills => 'h',
            PlotKind::Peak => '^',
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Ocean,
    Coast,
    Grass,
    Plains,
    Desert,
    Tundra,
    Snow,
    Marsh,
}

impl Terrain {
    pub fn is_water(self) -> bool {
        matches!(self, Terrain::Ocean | Terrain::Coast)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Forest,
    Jungle,
    Ice,
    Oasis,
    FloodPlains,
}

/// Resource marker placed through the resource capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Banana,
    Clam,
    Coal,
    Copper,
    Cow,
    Crab,
    Deer,
    Fish,
    Fur,
    Gold,
    Horse,
    Iron,
    Marble,
    Oil,
    Sheep,
    Shrimp,
    Silver,
    Sulphur,
    Uranium,
}

impl Resource {
    /// Resources that only make sense in water.
    pub fn is_aquatic(self) -> bool {
        matches!(
            self,
            Resource::Clam | Resource::Crab | Resource::Fish | Resource::Shrimp
        )
    }
}

/// Connected-area identifier. Valid until the next area recalculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u32);

/// River identifier drawn from the river maker's counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiverId(pub u32);

/// One grid cell.
///
/// The two river flags describe the edges that meet at the plot's south-east
/// corner and belong to this plot: `n_of_river` is a river along the south
/// edge (the plot is north of it), flowing east or west; `w_of_river` is a
/// river along the east edge (the plot is west of it), flowing north or south.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub kind: PlotKind,
    pub terrain: Terrain,
    pub feature: Option<Feature>,
    pub resource: Option<Resource>,
    pub area: Option<AreaId>,
    pub river_id: Option<RiverId>,
    pub n_of_river: Option<CardinalDirection>,
    pub w_of_river: Option<CardinalDirection>,
}

impl Plot {
    pub fn new(kind: PlotKind, terrain: Terrain) -> Self {
        Self {
            kind,
            terrain,
            ..Default::default()
        }
    }

    pub fn is_water(&self) -> bool {
        self.kind.is_water()
    }

    pub fn is_flat(&self) -> bool {
        self.kind.is_flat()
    }

    pub fn is_hills(&self) -> bool {
        self.kind == PlotKind::Hills
    }

    pub fn is_peak(&self) -> bool {
        self.kind == PlotKind::Peak
    }

    pub fn is_n_of_river(&self) -> bool {
        self.n_of_river.is_some()
    }

    pub fn is_w_of_river(&self) -> bool {
        self.w_of_river.is_some()
    }

    /// Any river edge owned by this plot.
    pub fn has_river_edge(&self) -> bool {
        self.is_n_of_river() || self.is_w_of_river()
    }
}
