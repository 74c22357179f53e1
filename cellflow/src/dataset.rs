//! Synthetic linear data: `y = 2x + 3 + noise`.

use serde::{Deserialize, Serialize};

use crate::errors::{DataError, Result};
use crate::random::RandomSource;

pub const SLOPE: f64 = 2.0;
pub const INTERCEPT: f64 = 3.0;

/// x values cover `[0, X_SPAN)`.
pub const X_SPAN: f64 = 10.0;

/// Noise is uniform in `[-NOISE_AMPLITUDE, NOISE_AMPLITUDE]`.
pub const NOISE_AMPLITUDE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Points in generation order, x non-decreasing.
pub type Dataset = Vec<DataPoint>;

/// Generate `count` points, drawing one noise value per point from `source`.
pub fn generate<R: RandomSource + ?Sized>(count: usize, source: &mut R) -> Result<Dataset> {
    if count == 0 {
        return Err(DataError::InvalidCount(0).into());
    }

    let n = count as f64;
    let data = (0..count)
        .map(|i| {
            let x = i as f64 / n * X_SPAN;
            let noise = (source.next() - 0.5) * 2.0 * NOISE_AMPLITUDE;
            let y = SLOPE * x + INTERCEPT + noise;
            DataPoint::new(round2(x), round2(y))
        })
        .collect();

    Ok(data)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
