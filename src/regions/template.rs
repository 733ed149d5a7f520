//! Symbolic region templates.
//!
//! A template is a fixed-size grid of optional symbols. Rows may be shorter
//! than the widest row; missing cells hold `None`. Templates never change in
//! place: rotation and pruning return new templates.

use serde::{Deserialize, Serialize};

/// 1 lake, 2 marshy flat, 3 probably marsh, 4 probably grass, 5 hills or peak
pub const BIG_BOG: [&[u8]; 10] = [
    &[0, 0, 0, 4, 5, 5, 4, 0, 0, 0, 0],
    &[0, 0, 5, 4, 4, 4, 4, 4, 5, 0, 0],
    &[0, 5, 4, 4, 3, 3, 3, 3, 4, 5, 0],
    &[0, 4, 3, 2, 2, 2, 2, 2, 3, 4, 0],
    &[5, 4, 3, 2, 1, 1, 2, 2, 3, 4, 5],
    &[5, 4, 3, 2, 1, 1, 2, 2, 3, 4, 5],
    &[0, 4, 3, 2, 2, 2, 2, 2, 3, 4, 0],
    &[0, 5, 4, 4, 3, 3, 3, 4, 4, 5, 0],
    &[0, 0, 5, 4, 3, 3, 4, 4, 5, 0, 0],
    &[0, 0, 0, 5, 4, 4, 5, 0, 0, 0, 0],
];

pub const SMALL_BOG: [&[u8]; 9] = [
    &[0, 0, 5, 5, 4, 0, 0],
    &[0, 5, 4, 3, 4, 5, 0],
    &[4, 3, 3, 2, 3, 4, 4],
    &[4, 3, 2, 1, 2, 4, 5],
    &[5, 4, 2, 1, 2, 4, 5],
    &[4, 3, 2, 2, 2, 4, 5],
    &[4, 3, 3, 2, 3, 3, 4],
    &[0, 5, 4, 3, 4, 5, 0],
    &[0, 0, 4, 5, 4, 0, 0],
];

/// 1 volcano candidate, 2 probably peaks, 3 peaks or hills, 4 probably hills
pub const DENT: [&[u8]; 10] = [
    &[0, 0, 0, 0, 4, 4, 4, 4, 3, 4, 0, 0, 0, 0],
    &[0, 0, 4, 4, 4, 3, 3, 3, 3, 3, 4, 4, 0, 0],
    &[0, 4, 4, 3, 3, 2, 2, 3, 2, 3, 3, 3, 4, 0],
    &[0, 4, 3, 2, 4, 2, 2, 2, 2, 2, 2, 3, 4, 0],
    &[4, 3, 2, 2, 2, 1, 1, 4, 1, 2, 3, 2, 3, 4],
    &[4, 3, 2, 2, 1, 1, 2, 2, 1, 1, 4, 2, 3, 4],
    &[0, 4, 3, 2, 2, 2, 4, 2, 2, 2, 2, 3, 4, 0],
    &[0, 4, 4, 3, 3, 2, 2, 2, 2, 3, 3, 4, 4, 0],
    &[0, 0, 4, 4, 4, 3, 3, 3, 3, 3, 4, 4, 0, 0],
    &[0, 0, 0, 0, 4, 4, 4, 4, 4, 4, 0, 0, 0, 0],
];

/// 0 ocean, 1 land, 2 hills, 3 peak; north on top
pub const LOST_ISLE: [&[u8]; 5] = [
    &[0, 3, 3, 3, 0],
    &[3, 2, 1, 1, 2],
    &[0, 2, 0, 2, 3],
    &[0, 1, 2, 3, 0],
    &[0, 0, 3, 0, 0],
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    rows: usize,
    cols: usize,
    cells: Vec<Option<u8>>,
}

/// Map rectangle covered by a template placed at an anchor. Coordinates are
/// unwrapped and may lie off the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extents {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Extents {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// True for coordinates on the ring one step outside the rectangle.
    pub fn on_border(&self, x: i32, y: i32) -> bool {
        let inside_ring = (self.min_x - 1..=self.max_x + 1).contains(&x)
            && (self.min_y - 1..=self.max_y + 1).contains(&y);
        inside_ring && !self.contains(x, y)
    }
}

impl Template {
    /// Build from rows of possibly different lengths.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            for c in 0..cols {
                cells.push(row.get(c).copied());
            }
        }
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Symbol at (row, col); `None` for "no data" and outside the template.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Taller than wide.
    pub fn is_sideways(&self) -> bool {
        self.cols < self.rows
    }

    /// Quarter-turn steps: row v of each step is column v of the previous
    /// template, top to bottom. `steps` is taken mod 4 with 0 counted as 4.
    pub fn rotate(&self, steps: u32) -> Template {
        let steps = match steps % 4 {
            0 => 4,
            s => s,
        };
        let mut current = self.clone();
        for _ in 0..steps {
            let mut cells = Vec::with_capacity(current.cells.len());
            for v in 0..current.cols {
                for k in 0..current.rows {
                    cells.push(current.get(k, v));
                }
            }
            current = Template {
                rows: current.cols,
                cols: current.rows,
                cells,
            };
        }
        current
    }

    /// Copy without the given row. Out-of-range rows leave it unchanged.
    pub fn without_row(&self, row: usize) -> Template {
        if row >= self.rows {
            return self.clone();
        }
        let cells = self
            .cells
            .chunks(self.cols.max(1))
            .enumerate()
            .filter(|(r, _)| *r != row)
            .flat_map(|(_, chunk)| chunk.iter().copied())
            .collect();
        Template {
            rows: self.rows - 1,
            cols: self.cols,
            cells,
        }
    }

    /// Copy without the given column. Out-of-range columns leave it unchanged.
    pub fn without_column(&self, col: usize) -> Template {
        if col >= self.cols {
            return self.clone();
        }
        let mut cells = Vec::with_capacity(self.rows * (self.cols - 1));
        for r in 0..self.rows {
            for c in (0..self.cols).filter(|&c| c != col) {
                cells.push(self.get(r, c));
            }
        }
        Template {
            rows: self.rows,
            cols: self.cols - 1,
            cells,
        }
    }

    /// Rectangle covered when centred on the anchor: `min = anchor - (len-1)/2`.
    pub fn extents(&self, anchor_x: i32, anchor_y: i32) -> Extents {
        let min_x = anchor_x - (self.cols as i32 - 1) / 2;
        let min_y = anchor_y - (self.rows as i32 - 1) / 2;
        Extents {
            min_x,
            min_y,
            max_x: min_x + self.cols as i32 - 1,
            max_y: min_y + self.rows as i32 - 1,
        }
    }

    /// Every template cell with its unwrapped map coordinate, row-major.
    pub fn placed(&self, anchor_x: i32, anchor_y: i32) -> Vec<(i32, i32, Option<u8>)> {
        let ext = self.extents(anchor_x, anchor_y);
        let mut out = Vec::with_capacity(self.cells.len());
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push((ext.min_x + c as i32, ext.min_y + r as i32, self.get(r, c)));
            }
        }
        out
    }

    /// First cell holding `symbol`, row-major.
    pub fn find(&self, symbol: u8) -> Option<(usize, usize)> {
        let i = self.cells.iter().position(|&c| c == Some(symbol))?;
        Some((i / self.cols, i % self.cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_two_by_two() {
        let t = Template::from_rows(&[&[1, 2], &[3, 4]]);
        let r = t.rotate(1);
        assert_eq!(r, Template::from_rows(&[&[1, 3], &[2, 4]]));
    }

    #[test]
    fn test_rotate_four_is_identity() {
        let t = Template::from_rows(&DENT);
        assert_eq!(t.rotate(4), t);
        assert_eq!(t.rotate(0), t);
        assert_eq!(t.rotate(1).rotate(3), t);
    }

    #[test]
    fn test_rotate_swaps_shape() {
        let t = Template::from_rows(&BIG_BOG);
        assert_eq!((t.rows(), t.cols()), (10, 11));
        let r = t.rotate(1);
        assert_eq!((r.rows(), r.cols()), (11, 10));
        assert!(r.is_sideways());
        assert_eq!(r.get(0, 4), t.get(4, 0));
    }

    #[test]
    fn test_ragged_rows_pad_with_none() {
        let t = Template::from_rows(&[&[1, 2, 3], &[4]]);
        assert_eq!(t.cols(), 3);
        assert_eq!(t.get(1, 0), Some(4));
        assert_eq!(t.get(1, 2), None);
        let r = t.rotate(1);
        assert_eq!(r.get(2, 1), None);
        assert_eq!(r.get(2, 0), Some(3));
    }

    #[test]
    fn test_pruning() {
        let t = Template::from_rows(&SMALL_BOG);
        let p = t.without_row(5).without_row(3);
        assert_eq!(p.rows(), 7);
        assert_eq!(p.get(3, 0), t.get(4, 0));
        let c = Template::from_rows(&DENT).without_column(8).without_column(6);
        assert_eq!(c.cols(), 12);
        // column 8 held the 3 of the top row
        assert_eq!(c.get(0, 7), Some(4));
        assert!((0..c.cols()).all(|col| c.get(0, col) != Some(3)));
        assert_eq!(t.without_row(99), t);
    }

    #[test]
    fn test_extents_are_centred() {
        let t = Template::from_rows(&SMALL_BOG);
        let e = t.extents(10, 10);
        assert_eq!((e.min_x, e.max_x), (7, 13));
        assert_eq!((e.min_y, e.max_y), (6, 14));
        let even = Template::from_rows(&BIG_BOG).extents(10, 10);
        assert_eq!((even.min_y, even.max_y), (6, 15));
        assert!(even.on_border(4, 10));
        assert!(!even.on_border(5, 10));
    }

    #[test]
    fn test_find_and_placed() {
        let t = Template::from_rows(&SMALL_BOG);
        assert_eq!(t.find(1), Some((3, 3)));
        let cells = t.placed(3, 4);
        assert_eq!(cells.len(), 63);
        assert_eq!(cells[0], (0, 0, Some(0)));
    }
}
