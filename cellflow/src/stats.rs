//! Summary statistics over a dataset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::DataPoint;
use crate::errors::{DataError, Result};

/// Pearson correlation, or `Undefined` when either variable has zero variance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(self) -> Option<f64> {
        match self {
            Correlation::Defined(r) => Some(r),
            Correlation::Undefined => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Defined(r) => write!(f, "{r:.3}"),
            Correlation::Undefined => f.write_str("undefined"),
        }
    }
}

/// Least-squares line through the data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub correlation: Correlation,
    pub min_y: f64,
    pub max_y: f64,

    /// `None` when every x is the same.
    pub fit: Option<LineFit>,
}

pub fn summarize(dataset: &[DataPoint]) -> Result<Statistics> {
    if dataset.is_empty() {
        return Err(DataError::EmptyDataset.into());
    }

    let n = dataset.len() as f64;
    let mean_x = dataset.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = dataset.iter().map(|p| p.y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for point in dataset {
        let dx = point.x - mean_x;
        let dy = point.y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let correlation = pearson(sxy, sxx, syy);
    let fit = (sxx != 0.0).then(|| {
        let slope = sxy / sxx;
        LineFit {
            slope,
            intercept: mean_y - slope * mean_x,
        }
    });

    let min_y = dataset.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = dataset.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Ok(Statistics {
        count: dataset.len(),
        mean_x,
        mean_y,
        correlation,
        min_y,
        max_y,
        fit,
    })
}

fn pearson(sxy: f64, sxx: f64, syy: f64) -> Correlation {
    if sxx == 0.0 || syy == 0.0 {
        return Correlation::Undefined;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if r.is_finite() {
        Correlation::Defined(r.clamp(-1.0, 1.0))
    } else {
        Correlation::Undefined
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::Error;
    use crate::test::points;

    #[test]
    fn exact_line() {
        let stats = summarize(&points(&[(0.0, 3.0), (1.0, 5.0), (2.0, 7.0)])).unwrap();

        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.mean_x, 1.0);
        assert_relative_eq!(stats.mean_y, 5.0);
        assert_relative_eq!(stats.correlation.value().unwrap(), 1.0);
        assert_relative_eq!(stats.min_y, 3.0);
        assert_relative_eq!(stats.max_y, 7.0);

        let fit = stats.fit.unwrap();
        assert_relative_eq!(fit.slope, 2.0);
        assert_relative_eq!(fit.intercept, 3.0);
        assert_relative_eq!(fit.predict(4.0), 11.0);
    }

    #[test]
    fn falling_line_is_negative() {
        let stats = summarize(&points(&[(0.0, 4.0), (1.0, 2.0), (2.0, 0.0)])).unwrap();
        assert_relative_eq!(stats.correlation.value().unwrap(), -1.0);
    }

    #[test]
    fn constant_y_has_undefined_correlation() {
        let stats = summarize(&points(&[(0.0, 4.0), (1.0, 4.0), (2.0, 4.0)])).unwrap();
        assert_eq!(stats.correlation, Correlation::Undefined);
        assert_eq!(stats.correlation.to_string(), "undefined");
        assert_relative_eq!(stats.fit.unwrap().slope, 0.0);
    }

    #[test]
    fn single_point_has_no_fit() {
        let stats = summarize(&points(&[(1.5, 2.5)])).unwrap();
        assert_eq!(stats.correlation, Correlation::Undefined);
        assert_eq!(stats.fit, None);
        assert_relative_eq!(stats.min_y, 2.5);
        assert_relative_eq!(stats.max_y, 2.5);
    }

    #[test]
    fn huge_values_keep_full_correlation() {
        let stats = summarize(&points(&[(0.0, 0.0), (1e100, 1e100), (2e100, 2e100)])).unwrap();
        let r = stats.correlation.value().expect("correlation should be defined");
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = summarize(&[]).expect_err("nothing to summarize");
        assert!(matches!(err, Error::Data(DataError::EmptyDataset)));
    }

    #[test]
    fn correlation_displays_three_decimals() {
        assert_eq!(Correlation::Defined(0.98765).to_string(), "0.988");
    }
}
