use crate::error::{Error, Result};
use rand::distr::{Distribution, Uniform};
use rand::Rng;

/// Squared distance, accumulated in f64 so finite f32 inputs stay finite.
#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}

/// Validate a dense dataset and return its dimensionality.
pub(crate) fn validate_points(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(Error::Domain("dataset contains non-finite values"));
        }
    }
    Ok(d)
}

/// Index of the nearest centroid and the squared distance to it.
///
/// Ties resolve to the lowest index.
#[inline]
pub(crate) fn nearest(point: &[f32], centroids: &[Vec<f32>]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, c) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, c);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    (best, best_dist)
}

/// Per-dimension `[min, max]` box of a dataset, with one sampler per
/// dimension.
///
/// Sampling happens in f64: the width of two finite f32 bounds can overflow
/// f32 but never f64.
#[derive(Clone, Debug)]
pub(crate) struct Bounds {
    pub(crate) min: Vec<f32>,
    pub(crate) max: Vec<f32>,
    dims: Vec<Uniform<f64>>,
}

impl Bounds {
    /// Caller guarantees `data` is non-empty and rectangular.
    pub(crate) fn of(data: &[Vec<f32>]) -> Result<Self> {
        let mut min = data[0].clone();
        let mut max = data[0].clone();
        for point in &data[1..] {
            for (j, &x) in point.iter().enumerate() {
                min[j] = min[j].min(x);
                max[j] = max[j].max(x);
            }
        }
        let dims = min
            .iter()
            .zip(&max)
            .map(|(&lo, &hi)| {
                Uniform::new_inclusive(lo as f64, hi as f64)
                    .map_err(|_| Error::Domain("dataset bounds do not form a valid range"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { min, max, dims })
    }

    /// Draw one point uniformly inside the box, each dimension independently.
    ///
    /// Rounding back to f32 cannot leave the box: both ends are f32 values.
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        self.dims.iter().map(|u| u.sample(rng) as f32).collect()
    }
}
