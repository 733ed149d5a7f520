/// Largest width or height a tilemap accepts. Every coordinate and
/// dimension fits an `i32` with room for offsets and wrap arithmetic.
pub const MAX_DIMENSION: usize = 1 << 15;

/// A 2D tilemap grid stored row-major, with optional wrapping on each axis.
///
/// Row 0 is the northern edge; y grows southward and x grows eastward.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    /// East and west edges are joined
    pub wrap_x: bool,
    /// North and south edges are joined
    pub wrap_y: bool,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_with(width, height, T::default())
    }
}

impl<T: Clone> Tilemap<T> {
    /// Create a tilemap filled with `value`. Dimensions are clamped to
    /// `1..=MAX_DIMENSION`.
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        let width = width.clamp(1, MAX_DIMENSION);
        let height = height.clamp(1, MAX_DIMENSION);
        Self {
            width,
            height,
            wrap_x: false,
            wrap_y: false,
            data: vec![value; width * height],
        }
    }

    /// Set the wrap flags (builder style).
    pub fn with_wrap(mut self, wrap_x: bool, wrap_y: bool) -> Self {
        self.wrap_x = wrap_x;
        self.wrap_y = wrap_y;
        self
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Tilemap<T> {
    /// Reduce both coordinates modulo the map size, regardless of the wrap flags.
    pub fn normalize(&self, x: i32, y: i32) -> (usize, usize) {
        (
            x.rem_euclid(self.width as i32) as usize,
            y.rem_euclid(self.height as i32) as usize,
        )
    }

    /// Row-major index of a coordinate after normalization.
    pub fn index_at(&self, x: i32, y: i32) -> usize {
        let (x, y) = self.normalize(x, y);
        y * self.width + x
    }

    /// Coordinate of a row-major index.
    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Resolve a coordinate the way the map's topology does: wrapping axes
    /// fold around, anything beyond a non-wrapping edge is `None`.
    pub fn resolve(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let w = self.width as i32;
        let h = self.height as i32;
        let x = if self.wrap_x {
            x.rem_euclid(w)
        } else if (0..w).contains(&x) {
            x
        } else {
            return None;
        };
        let y = if self.wrap_y {
            y.rem_euclid(h)
        } else if (0..h).contains(&y) {
            y
        } else {
            return None;
        };
        Some((x as usize, y as usize))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Value at any integer coordinate (always normalized).
    pub fn get_wrapped(&self, x: i32, y: i32) -> &T {
        &self.data[self.index_at(x, y)]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get neighbors respecting the wrap flags (4-connectivity).
    /// Order: north, east, south, west.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let (x, y) = (x as i32, y as i32);
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .iter()
            .filter_map(|&(dx, dy)| self.resolve(x + dx, y + dy))
            .collect()
    }

    /// Get 8-connected neighbors respecting the wrap flags, row-major order.
    /// On tiny wrapping maps a neighbor may repeat or equal the centre.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                // Skip self
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(n) = self.resolve(x as i32 + dx, y as i32 + dy) {
                    result.push(n);
                }
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_are_clamped() {
        let map: Tilemap<u8> = Tilemap::new(MAX_DIMENSION + 5, 0);
        assert_eq!((map.width, map.height), (MAX_DIMENSION, 1));
        let edge = MAX_DIMENSION as i32 - 1;
        assert_eq!(map.normalize(edge + 1, 0), (0, 0));
        assert_eq!(map.normalize(-1, 0), (MAX_DIMENSION - 1, 0));
    }

    #[test]
    fn test_normalize_negative_and_large() {
        let map: Tilemap<u8> = Tilemap::new(10, 6);
        assert_eq!(map.normalize(-1, -1), (9, 5));
        assert_eq!(map.normalize(23, 13), (3, 1));
        assert_eq!(map.index_at(-1, 0), 9);
    }

    #[test]
    fn test_resolve_respects_wrap_flags() {
        let flat: Tilemap<u8> = Tilemap::new(4, 4);
        assert_eq!(flat.resolve(-1, 0), None);
        assert_eq!(flat.resolve(0, 4), None);
        assert_eq!(flat.resolve(3, 3), Some((3, 3)));

        let cylinder: Tilemap<u8> = Tilemap::new(4, 4).with_wrap(true, false);
        assert_eq!(cylinder.resolve(-1, 0), Some((3, 0)));
        assert_eq!(cylinder.resolve(0, -1), None);
    }

    #[test]
    fn test_neighbors_at_corner() {
        let flat: Tilemap<u8> = Tilemap::new(5, 5);
        assert_eq!(flat.neighbors(0, 0), vec![(1, 0), (0, 1)]);
        assert_eq!(flat.neighbors_8(0, 0).len(), 3);

        let torus: Tilemap<u8> = Tilemap::new(5, 5).with_wrap(true, true);
        assert_eq!(torus.neighbors_8(0, 0).len(), 8);
    }
}
