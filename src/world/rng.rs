//! Deterministic random stream for world generation
//!
//! The sequence for a given seed must never change: chunks are evicted and
//! regenerated as the player moves and have to come back identical.

/// A reproducible stream of reals in [0, 1)
pub trait RandomStream {
    /// Next value in [0, 1)
    fn next(&mut self) -> f64;

    /// Value in [min, max)
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform pick from a slice. Always consumes one draw.
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let roll = self.next();
        if items.is_empty() {
            return None;
        }
        let index = ((roll * items.len() as f64).floor() as usize).min(items.len() - 1);
        items.get(index)
    }

    /// Fair coin: 1.0 for the right-hand side of the road, -1.0 for the left
    fn side(&mut self) -> f64 {
        if self.next() > 0.5 { 1.0 } else { -1.0 }
    }
}

/// Sine-hash generator: `fract(sin(seed++) * 10000)`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: f64,
}

impl SeededRandom {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// Seed used for a terrain chunk
    pub fn for_chunk(chunk_id: i64) -> Self {
        Self::new((chunk_id * 12345) as f64)
    }
}

impl RandomStream for SeededRandom {
    fn next(&mut self) -> f64 {
        let x = self.seed.sin() * 10000.0;
        self.seed += 1.0;
        x - x.floor()
    }
}
