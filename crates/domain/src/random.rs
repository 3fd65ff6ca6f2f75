//! Injected randomness.
//!
//! The domain never reaches for a global generator. Callers hand in a
//! `RandomSource`, so tests can script every draw and production can seed one.

/// Source of uniform random numbers.
pub trait RandomSource {
    /// Uniform f64 in `[0.0, 1.0)`
    fn random_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max]` (inclusive). Returns `min` if `max < min`.
    fn random_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.random_f64() * span) as usize;
        min + offset.min(max - min)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.random_f64() < p
    }
}

/// Pick one element uniformly. `None` for an empty slice.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0, items.len() - 1))
}

/// Scripted source for tests: replays the given values in a loop.
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns the same value
    pub(crate) fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn random_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let mut low = ScriptedRandom::constant(0.0);
        let mut high = ScriptedRandom::constant(0.999_999);
        assert_eq!(low.random_range(2, 4), 2);
        assert_eq!(high.random_range(2, 4), 4);
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(rng.random_range(3, 3), 3);
        assert_eq!(rng.random_range(5, 1), 5);
    }

    #[test]
    fn pick_handles_empty_and_bounds() {
        let mut rng = ScriptedRandom::constant(0.999_999);
        let empty: [u8; 0] = [];
        assert_eq!(pick(&mut rng, &empty), None);
        assert_eq!(pick(&mut rng, &[1, 2, 3]), Some(&3));
    }

    #[test]
    fn chance_compares_against_threshold() {
        let mut rng = ScriptedRandom::new(vec![0.69, 0.71]);
        assert!(rng.chance(0.7));
        assert!(!rng.chance(0.7));
    }
}
