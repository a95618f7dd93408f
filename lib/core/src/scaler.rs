//! Per-batch z-score standardization.
//!
//! A [`StandardScaler`] is fit on exactly one batch and discarded afterwards.
//! Anything compared against that batch (a mood profile, a query) must go
//! through the same fitted scaler.

use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_DIM};

/// Fitted mean and inverse standard deviation per dimension
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: FeatureVector,
    std_dev: FeatureVector,
    /// 0.0 for constant columns, so they standardize to 0 instead of NaN
    inv_std: FeatureVector,
}

impl StandardScaler {
    /// Fit on a batch using the population variance (divisor N)
    pub fn fit(rows: &[FeatureVector]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; FEATURE_DIM];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = [0.0; FEATURE_DIM];
        for row in rows {
            for ((v, x), m) in variance.iter_mut().zip(row.iter()).zip(mean.iter()) {
                let d = x - m;
                *v += d * d;
            }
        }

        let mut std_dev = [0.0; FEATURE_DIM];
        let mut inv_std = [0.0; FEATURE_DIM];
        for dim in 0..FEATURE_DIM {
            let var = variance[dim] / n;
            // Rounding noise in the mean leaves a tiny residual on constant columns
            let noise_floor = (n * f64::EPSILON * mean[dim].abs()).powi(2);
            if var > noise_floor && var > 0.0 {
                std_dev[dim] = var.sqrt();
                inv_std[dim] = 1.0 / std_dev[dim];
            }
        }

        Ok(Self {
            mean,
            std_dev,
            inv_std,
        })
    }

    /// Standard deviation per dimension; 0.0 marks a constant column
    #[inline]
    pub fn std_dev(&self) -> &FeatureVector {
        &self.std_dev
    }

    /// Standardize one vector with the fitted parameters
    #[inline]
    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_DIM];
        for dim in 0..FEATURE_DIM {
            out[dim] = (row[dim] - self.mean[dim]) * self.inv_std[dim];
        }
        out
    }

    pub fn transform_batch(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Fit on `rows` and return them standardized along with the scaler
    pub fn fit_transform(rows: &[FeatureVector]) -> Result<(Self, Vec<FeatureVector>)> {
        let scaler = Self::fit(rows)?;
        let transformed = scaler.transform_batch(rows);
        Ok((scaler, transformed))
    }
}
