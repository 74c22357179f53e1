//! Injectable sources of uniform noise.

use std::sync::Arc;

use parking_lot::Mutex;

/// Uniform random values in `[0, 1)`.
pub trait RandomSource {
    fn next(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}

/// A random source shared between a notebook and the cell that draws from it.
///
/// Only ever locked from the thread running the evaluation pass.
pub type SharedSource = Arc<Mutex<dyn RandomSource + Send>>;

pub fn shared(source: impl RandomSource + Send + 'static) -> SharedSource {
    Arc::new(Mutex::new(source))
}

/// Production source backed by `fastrand`.
#[derive(Clone, Debug)]
pub struct FastRandSource {
    rng: fastrand::Rng,
}

impl FastRandSource {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Seeded when `seed` is given, otherwise seeded from the environment.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }
}

impl Default for FastRandSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandSource {
    fn next(&mut self) -> f64 {
        self.rng.f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_unit_interval() {
        let mut source = FastRandSource::with_seed(7);
        for _ in 0..1000 {
            let v = source.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = FastRandSource::with_seed(42);
        let mut b = FastRandSource::with_seed(42);
        let left: Vec<f64> = (0..16).map(|_| a.next()).collect();
        let right: Vec<f64> = (0..16).map(|_| b.next()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn shared_source_is_usable_through_the_lock() {
        let source = shared(FastRandSource::with_seed(1));
        let v = source.lock().next();
        assert!((0.0..1.0).contains(&v));
    }
}
