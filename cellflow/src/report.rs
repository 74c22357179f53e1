//! Classification of a sample and its statistics into report labels.
//!
//! Only fixed thresholds and fixed text live here. Laying the report out for
//! display is up to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stats::{Correlation, Statistics};

/// Samples below this size are small and carry a warning.
pub const SMALL_SAMPLE_LIMIT: usize = 50;

/// Samples below this size (and not small) are medium.
pub const LARGE_SAMPLE_LIMIT: usize = 100;

/// Correlation above which the linear-model insight is shown.
pub const INSIGHT_THRESHOLD: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleSize {
    Small,
    Medium,
    Large,
}

impl SampleSize {
    pub fn classify(sample_count: usize) -> Self {
        if sample_count < SMALL_SAMPLE_LIMIT {
            SampleSize::Small
        } else if sample_count < LARGE_SAMPLE_LIMIT {
            SampleSize::Medium
        } else {
            SampleSize::Large
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SampleSize::Small => "small",
            SampleSize::Medium => "medium",
            SampleSize::Large => "large",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SampleSize::Small => "Small Sample Analysis",
            SampleSize::Medium => "Medium Sample Analysis",
            SampleSize::Large => "Large Sample Analysis",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            SampleSize::Small => {
                "Sample size is relatively small. Consider increasing to at least 50 points \
                 for more reliable statistical inference."
            }
            SampleSize::Medium => "Sample size is adequate for basic statistical analysis.",
            SampleSize::Large => {
                "Sample size is robust and suitable for reliable statistical inference."
            }
        }
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    /// The correlation itself is undefined.
    Indeterminate,
}

impl CorrelationStrength {
    /// Classify by absolute value, so strongly negative data is strong too.
    pub fn classify(correlation: Correlation) -> Self {
        let Some(r) = correlation.value() else {
            return CorrelationStrength::Indeterminate;
        };
        let r = r.abs();
        if r > 0.9 {
            CorrelationStrength::VeryStrong
        } else if r > 0.7 {
            CorrelationStrength::Strong
        } else if r > 0.5 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CorrelationStrength::VeryStrong => "very strong",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub sample_count: usize,
    pub size: SampleSize,
    pub strength: CorrelationStrength,
    pub low_sample_warning: bool,
    pub high_correlation_insight: bool,

    // Inputs the labels were derived from.
    pub correlation: Correlation,
    pub mean_y: f64,
    pub min_y: f64,
    pub max_y: f64,
}

pub fn compose(sample_count: usize, stats: &Statistics) -> Report {
    Report {
        sample_count,
        size: SampleSize::classify(sample_count),
        strength: CorrelationStrength::classify(stats.correlation),
        low_sample_warning: sample_count < SMALL_SAMPLE_LIMIT,
        high_correlation_insight: stats
            .correlation
            .value()
            .is_some_and(|r| r > INSIGHT_THRESHOLD),
        correlation: stats.correlation,
        mean_y: stats.mean_y,
        min_y: stats.min_y,
        max_y: stats.max_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(correlation: Correlation) -> Statistics {
        Statistics {
            count: 3,
            mean_x: 1.0,
            mean_y: 5.0,
            correlation,
            min_y: 3.0,
            max_y: 7.0,
            fit: None,
        }
    }

    #[test]
    fn sample_size_thresholds() {
        let stats = stats_with(Correlation::Defined(0.95));

        let small = compose(49, &stats);
        assert_eq!(small.size, SampleSize::Small);
        assert!(small.low_sample_warning);

        let medium = compose(50, &stats);
        assert_eq!(medium.size, SampleSize::Medium);
        assert!(!medium.low_sample_warning);

        assert_eq!(compose(99, &stats).size, SampleSize::Medium);
        assert_eq!(compose(100, &stats).size, SampleSize::Large);
        assert_eq!(compose(150, &stats).size, SampleSize::Large);
    }

    #[test]
    fn strength_thresholds_use_absolute_value() {
        let cases = [
            (0.95, CorrelationStrength::VeryStrong),
            (0.9, CorrelationStrength::Strong),
            (0.75, CorrelationStrength::Strong),
            (0.6, CorrelationStrength::Moderate),
            (0.5, CorrelationStrength::Weak),
            (0.1, CorrelationStrength::Weak),
            (-0.95, CorrelationStrength::VeryStrong),
            (-0.6, CorrelationStrength::Moderate),
        ];
        for (r, expected) in cases {
            assert_eq!(
                CorrelationStrength::classify(Correlation::Defined(r)),
                expected,
                "r = {r}"
            );
        }
    }

    #[test]
    fn undefined_correlation_is_indeterminate_not_weak() {
        let report = compose(80, &stats_with(Correlation::Undefined));
        assert_eq!(report.strength, CorrelationStrength::Indeterminate);
        assert!(!report.high_correlation_insight);
    }

    #[test]
    fn insight_needs_positive_correlation_above_threshold() {
        assert!(compose(60, &stats_with(Correlation::Defined(0.81))).high_correlation_insight);
        assert!(!compose(60, &stats_with(Correlation::Defined(0.8))).high_correlation_insight);
        assert!(!compose(60, &stats_with(Correlation::Defined(-0.95))).high_correlation_insight);
    }

    #[test]
    fn report_keeps_source_numbers() {
        let report = compose(10, &stats_with(Correlation::Defined(0.5)));
        assert_eq!(report.sample_count, 10);
        assert_eq!(report.correlation, Correlation::Defined(0.5));
        assert_eq!(report.mean_y, 5.0);
        assert_eq!(report.min_y, 3.0);
        assert_eq!(report.max_y, 7.0);
        assert_eq!(report.size.to_string(), "small");
        assert_eq!(report.strength.to_string(), "weak");
    }
}
