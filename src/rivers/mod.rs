//! River network generator
//!
//! Rivers are built edge by edge between lattice vertices (the south-east
//! corners of plots). Each edge is recorded once, on the plot that owns it
//! (see [`vertex`]), together with the direction the water flows.
//!
//! Down-flow rivers are built from the source toward the sea; up-flow rivers
//! start at a lake or river and climb toward a source. Up-flow rivers may
//! branch off an existing river with their first edge, down-flow rivers may
//! only end in one.

pub mod flow;
pub mod island;
pub mod lake;
pub mod rim;
pub mod vertex;

use serde::{Deserialize, Serialize};

use crate::config::RiverParams;
use crate::direction::CardinalDirection;
use crate::grid::WorldGrid;
use crate::plot::{PlotKind, RiverId};
use crate::rng::RandomSource;

pub use rim::RimStart;

/// Direction a river is built in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    /// From the source toward the sea
    Down,
    /// From the sea or a lake toward a source
    Up,
}

/// How [`RiverMaker::best_flow_dir`] weighs the candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMode {
    /// Start of a river: head away from where it should end
    Long,
    /// Continuation: follow the terrain
    Short,
}

/// One recorded edge: the owning plot and the direction the water flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiverStep {
    pub x: usize,
    pub y: usize,
    pub flow: CardinalDirection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub id: RiverId,
    pub flow: Flow,
    /// Ordered source to mouth
    pub steps: Vec<RiverStep>,
}

impl River {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One-line description of a river for logs.
pub fn river_summary(river: &River) -> String {
    let polarity = match river.flow {
        Flow::Down => "DownFlow",
        Flow::Up => "UpFlow",
    };
    let steps: Vec<String> = river
        .steps
        .iter()
        .map(|s| format!("[{},{} - {}]", s.x, s.y, s.flow))
        .collect();
    format!(
        "river {} ({polarity}): source {} mouth",
        river.id.0,
        steps.join(" ")
    )
}

/// Walk state of a single river build.
struct RiverBuild {
    x: usize,
    y: usize,
    flow: Flow,
    next: Option<CardinalDirection>,
    origin: Option<CardinalDirection>,
    first_edge: bool,
    peaks: u32,
    hills: u32,
    land: u32,
    steps: Vec<RiverStep>,
}

impl RiverBuild {
    fn new(x: usize, y: usize, flow: Flow, next: Option<CardinalDirection>) -> Self {
        Self {
            x,
            y,
            flow,
            next,
            origin: None,
            first_edge: true,
            peaks: 0,
            hills: 0,
            land: 0,
            steps: Vec::new(),
        }
    }

    /// Stop with probability `count / (count + offset)` once `count` reaches `from`.
    fn stochastic_stop<R: RandomSource>(rng: &mut R, count: u32, from: u32, offset: u32) -> bool {
        count >= from && rng.choose((count * 100 / (count + offset)) as i32)
    }
}

/// Builds rivers and hands out river ids.
#[derive(Clone, Debug)]
pub struct RiverMaker {
    pub params: RiverParams,
    next_id: u32,
}

impl Default for RiverMaker {
    fn default() -> Self {
        Self::new(RiverParams::default())
    }
}

impl RiverMaker {
    pub fn new(params: RiverParams) -> Self {
        Self { params, next_id: 0 }
    }

    /// Id the next built river will get.
    pub fn next_river_id(&self) -> RiverId {
        RiverId(self.next_id)
    }

    /// Build a river from the vertex of (x, y).
    ///
    /// Without a direction the first edge is chosen in long mode. The walk
    /// ends when no valid edge remains, at the mouth (down-flow) or at a
    /// source (up-flow, by a rising chance at peaks, hills and flat land).
    /// Returns `None` if no edge could be recorded.
    pub fn build_river<R: RandomSource>(
        &mut self,
        grid: &mut WorldGrid,
        rng: &mut R,
        x: usize,
        y: usize,
        flow: Flow,
        direction: Option<CardinalDirection>,
    ) -> Option<River> {
        let id = self.next_river_id();
        // a given first edge off the map takes the same roll as a chosen one
        if let Some(dir) = direction {
            if flow == Flow::Down
                && grid.is_edge_direction(x, y, dir)
                && !rng.choose(self.params.edge_chance as i32)
            {
                return None;
            }
        }
        let mut st = RiverBuild::new(x, y, flow, direction);

        loop {
            // no branching off another river, except the first edge upstream
            if let Some(other) = grid.plot(st.x, st.y).river_id {
                if other != id && (st.flow == Flow::Down || !st.first_edge) {
                    break;
                }
            }

            let dir = match st.next {
                Some(dir) => dir,
                None => {
                    let Some(best) =
                        self.best_flow_dir(grid, rng, st.x, st.y, st.flow, RouteMode::Long, &[])
                    else {
                        break;
                    };
                    st.origin = Some(best);
                    st.next = Some(best);
                    continue;
                }
            };

            if !grid.check_river_end(st.x, st.y, st.flow).contains(&dir) {
                break;
            }
            let recorded = match st.flow {
                Flow::Down => dir,
                Flow::Up => dir.opposite(),
            };
            let Some((ox, oy)) = grid.edge_owner(st.x, st.y, dir) else {
                break;
            };
            if !grid.set_edge_flow(st.x, st.y, dir, recorded) {
                break;
            }
            grid.set_river_id(st.x, st.y, id);
            st.steps.push(RiverStep {
                x: ox,
                y: oy,
                flow: recorded,
            });
            st.first_edge = false;

            // off the map is a fine end
            let Some((nx, ny)) = grid.cardinal_neighbor(st.x, st.y, dir) else {
                break;
            };
            st.x = nx;
            st.y = ny;

            if self.reached_end(grid, rng, &mut st) {
                break;
            }

            let mut forbidden = vec![dir.opposite()];
            if let Some(origin) = st.origin {
                forbidden.push(origin.opposite());
            }
            let Some(best) =
                self.best_flow_dir(grid, rng, st.x, st.y, st.flow, RouteMode::Short, &forbidden)
            else {
                break;
            };
            if st.origin.is_none() {
                st.origin = Some(best);
            }
            st.next = Some(best);
        }

        if st.steps.is_empty() {
            return None;
        }
        if st.flow == Flow::Up {
            st.steps.reverse();
        }
        self.next_id += 1;
        let river = River {
            id,
            flow: st.flow,
            steps: st.steps,
        };
        tracing::debug!("{}", river_summary(&river));
        Some(river)
    }

    /// Termination checks at the vertex just reached.
    fn reached_end<R: RandomSource>(&self, grid: &mut WorldGrid, rng: &mut R, st: &mut RiverBuild) -> bool {
        let (x, y) = (st.x, st.y);
        match st.flow {
            Flow::Down => grid.has_water_at_vertex(x, y),
            Flow::Up => {
                if grid.has_kind_at_vertex(x, y, PlotKind::Peak) {
                    st.peaks += 1;
                    RiverBuild::stochastic_stop(rng, st.peaks, 3, 2)
                } else if grid.has_kind_at_vertex(x, y, PlotKind::Hills) {
                    st.hills += 1;
                    RiverBuild::stochastic_stop(rng, st.hills, 3, 3)
                } else if grid.has_kind_at_vertex(x, y, PlotKind::Land) {
                    st.land += 1;
                    let stop = RiverBuild::stochastic_stop(rng, st.land, 6, 6);
                    if stop && self.params.make_source_hill {
                        grid.set_plot_kind(x, y, PlotKind::Hills);
                    }
                    stop
                } else {
                    false
                }
            }
        }
    }
}
