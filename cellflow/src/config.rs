//! Configuration for a notebook session.

use serde::{Deserialize, Serialize};

/// Configuration options for a notebook.
///
/// ```ignore
/// let notebook = Notebook::new(Config::default().seed(42).default_sample_size(80))?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sample size the input cell starts with.
    pub default_sample_size: i64,

    /// Slider lower bound.
    pub min_sample_size: i64,

    /// Slider upper bound.
    pub max_sample_size: i64,

    /// Slider step.
    pub step: i64,

    /// Seed for the noise source. Unseeded sessions draw fresh noise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Show timing information for propagation passes.
    pub show_timings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_sample_size: 50,
            min_sample_size: 10,
            max_sample_size: 200,
            step: 10,
            seed: None,
            show_timings: false,
        }
    }
}

impl Config {
    pub fn default_sample_size(mut self, size: i64) -> Self {
        self.default_sample_size = size;
        self
    }

    pub fn sample_range(mut self, min: i64, max: i64) -> Self {
        self.min_sample_size = min;
        self.max_sample_size = max;
        self
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn show_timings(mut self, enabled: bool) -> Self {
        self.show_timings = enabled;
        self
    }

    /// Clamp `value` to the slider range and round it to the nearest step.
    pub fn snap(&self, value: i64) -> i64 {
        let (min, max) = self.bounds();
        let step = self.step.max(1);
        let clamped = value.clamp(min, max);
        let steps = (clamped - min + step / 2) / step;
        (min + steps * step).min(max)
    }

    /// One step above `value`, snapped.
    pub fn increase(&self, value: i64) -> i64 {
        self.snap(value.saturating_add(self.step.max(1)))
    }

    /// One step below `value`, snapped.
    pub fn decrease(&self, value: i64) -> i64 {
        self.snap(value.saturating_sub(self.step.max(1)))
    }

    fn bounds(&self) -> (i64, i64) {
        if self.min_sample_size <= self.max_sample_size {
            (self.min_sample_size, self.max_sample_size)
        } else {
            (self.max_sample_size, self.min_sample_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_slider() {
        let config = Config::default();
        assert_eq!(config.default_sample_size, 50);
        assert_eq!((config.min_sample_size, config.max_sample_size), (10, 200));
        assert_eq!(config.step, 10);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn snap_clamps_and_rounds() {
        let config = Config::default();
        assert_eq!(config.snap(0), 10);
        assert_eq!(config.snap(-40), 10);
        assert_eq!(config.snap(1000), 200);
        assert_eq!(config.snap(54), 50);
        assert_eq!(config.snap(55), 60);
        assert_eq!(config.snap(120), 120);
    }

    #[test]
    fn increase_and_decrease_stay_in_range() {
        let config = Config::default();
        assert_eq!(config.increase(50), 60);
        assert_eq!(config.increase(200), 200);
        assert_eq!(config.decrease(50), 40);
        assert_eq!(config.decrease(10), 10);
    }

    #[test]
    fn builder_methods_chain() {
        let config = Config::default()
            .default_sample_size(80)
            .sample_range(20, 100)
            .step(20)
            .seed(9)
            .show_timings(true);
        assert_eq!(config.default_sample_size, 80);
        assert_eq!(config.snap(150), 100);
        assert_eq!(config.snap(50), 60);
        assert_eq!(config.seed, Some(9));
        assert!(config.show_timings);
    }
}
