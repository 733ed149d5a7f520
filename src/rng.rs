//! Random source used by every sculpting decision.
//!
//! All randomness flows through [`RandomSource::draw_int`], so a seeded
//! generator plus a fixed call sequence reproduces a map exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform integer in `0..bound`. A bound of 0 yields 0.
    fn draw_int(&mut self, bound: u32) -> u32;

    /// True with `percent` chance.
    fn choose(&mut self, percent: i32) -> bool {
        (self.draw_int(100) as i32) < percent
    }

    /// Pick from a table of ascending `(threshold, value)` pairs with a single
    /// draw: the first entry whose threshold exceeds the draw wins.
    fn choose_more<T: Copy>(&mut self, table: &[(u32, T)]) -> Option<T>
    where
        Self: Sized,
    {
        let roll = self.draw_int(100);
        table
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|&(_, value)| value)
    }

    /// Random element of a slice.
    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.draw_int(items.len() as u32) as usize;
        Some(items[i])
    }

    /// Remove and return a random element.
    fn pop<T>(&mut self, items: &mut Vec<T>) -> Option<T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.draw_int(items.len() as u32) as usize;
        Some(items.remove(i))
    }

    /// Fisher-Yates shuffle driven by `draw_int`.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.draw_int(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl RandomSource for ChaCha8Rng {
    fn draw_int(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.gen_range(0..bound)
        }
    }
}

/// Seeded map generator.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed list of draws (each reduced modulo the bound), then zeros.
    pub struct Scripted {
        draws: Vec<u32>,
        pos: usize,
    }

    impl Scripted {
        pub fn new(draws: &[u32]) -> Self {
            Self {
                draws: draws.to_vec(),
                pos: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn draw_int(&mut self, bound: u32) -> u32 {
            let value = self.draws.get(self.pos).copied().unwrap_or(0);
            self.pos += 1;
            if bound == 0 {
                0
            } else {
                value % bound
            }
        }
    }
}
