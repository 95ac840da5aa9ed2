//! Total intra-cluster variance.
//!
//! ```text
//! V(X, C) = Σ_i min_j ||x_i - c_j||²
//! ```
//!
//! This scores a finished clustering; nothing in the Lloyd loop depends on it.

use super::util;
use crate::error::{Error, Result};

/// Sum over all points of the squared distance to their nearest centroid.
///
/// Points are not required to carry labels: the nearest centroid is
/// recomputed for each point.
pub fn total_variance(data: &[Vec<f32>], centroids: &[Vec<f32>]) -> Result<f64> {
    let d = util::validate_points(data)?;
    if centroids.is_empty() {
        return Err(Error::EmptyInput);
    }
    for c in centroids {
        if c.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: c.len(),
            });
        }
    }

    Ok(data
        .iter()
        .map(|point| util::nearest(point, centroids).1)
        .sum())
}
