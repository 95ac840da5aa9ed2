//! Sweep k and report how much each extra cluster reduces total variance.
//!
//! The sweep does not pick a k for you: look for the "elbow" where
//! `variance_delta` stops growing quickly.

use super::kmeans::{Kmeans, KmeansFit};
use super::variance::total_variance;
use crate::error::{Error, Result};
use tracing::debug;

/// One k in an [`optimum_k`] sweep.
#[derive(Debug, Clone)]
pub struct KSweepEntry {
    /// Number of clusters.
    pub k: usize,
    /// K-means result for this k.
    pub fit: KmeansFit,
    /// Total intra-cluster variance of `fit`.
    pub variance: f64,
    /// Variance at `k_min` minus variance at this k.
    pub variance_delta: f64,
}

/// Run k-means for every k in `k_min..=k_max`.
///
/// `template` supplies the iteration cap and seed; its own k is ignored. One
/// generator is shared across the whole sweep, so a seeded template yields a
/// reproducible sweep.
pub fn optimum_k(
    data: &[Vec<f32>],
    k_min: usize,
    k_max: usize,
    template: &Kmeans,
) -> Result<Vec<KSweepEntry>> {
    if k_min == 0 {
        return Err(Error::InvalidParameter {
            name: "k_min",
            message: "must be at least 1",
        });
    }
    if k_max <= k_min {
        return Err(Error::InvalidParameter {
            name: "k_max",
            message: "must be greater than k_min",
        });
    }

    let mut rng = template.make_rng();
    let mut entries: Vec<KSweepEntry> = Vec::with_capacity(k_max - k_min + 1);
    let mut base = None;

    for k in k_min..=k_max {
        let fit = Kmeans::new(k)
            .with_max_iter(template.max_iter())
            .fit_with_rng(data, &mut rng)?;
        let variance = total_variance(data, &fit.centroids)?;
        let first = *base.get_or_insert(variance);
        debug!(k, variance, converged = fit.converged, "k sweep step");
        entries.push(KSweepEntry {
            k,
            fit,
            variance,
            variance_delta: first - variance,
        });
    }

    Ok(entries)
}
