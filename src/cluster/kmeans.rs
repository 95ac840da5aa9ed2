//! K-means: uniform bounding-box seeding followed by Lloyd iterations.
//!
//! # Seeding
//!
//! Initial centroids are drawn independently and uniformly inside the
//! per-dimension `[min, max]` box of the data. Empty-cluster recovery below
//! draws from the same distribution.
//!
//! # Lloyd iterations
//!
//! 1. Assign every point to its nearest centroid (squared Euclidean distance,
//!    ties to the lowest centroid index).
//! 2. Move every centroid to the mean of its assigned points.
//! 3. A centroid that received no points is redrawn uniformly inside the
//!    global bounding box.
//! 4. Stop when the centroids are unchanged (exact equality), or after
//!    `max_iter` rounds.
//!
//! Labels always come from the last assignment step, so after an early stop
//! they agree with the returned centroids. After hitting `max_iter` they
//! agree with the centroids of the previous round.
//!
//! # Reproducibility
//!
//! Both seeding and empty-cluster recovery consume randomness. Use
//! [`Kmeans::with_seed`] or pass an explicit generator to
//! [`Kmeans::fit_with_rng`] / [`initialize_centroids`].

use super::traits::Clustering;
use super::util::{self, Bounds};
use crate::error::{Error, Result};
use rand::prelude::*;
use tracing::{debug, trace};

/// Default iteration cap for Lloyd's algorithm.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// K-means clustering (Lloyd's algorithm).
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations.
    max_iter: usize,
    /// Random seed; `None` draws from OS entropy.
    seed: Option<u64>,
}

/// Output of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Final centroids, `k` rows of dimension `d`.
    pub centroids: Vec<Vec<f32>>,
    /// Cluster index of each input point, from the last assignment step.
    pub labels: Vec<usize>,
    /// Lloyd iterations performed.
    pub n_iter: usize,
    /// Whether the centroids stopped moving before the iteration cap.
    pub converged: bool,
}

impl KmeansFit {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Number of points assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

/// Draw `k` initial centroids uniformly inside the bounding box of `data`.
///
/// Each coordinate is sampled independently over the observed range of its
/// dimension.
pub fn initialize_centroids<R: Rng>(
    data: &[Vec<f32>],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f32>>> {
    util::validate_points(data)?;
    check_k(k)?;
    let bounds = Bounds::of(data)?;
    Ok(draw_centroids(&bounds, k, rng))
}

fn draw_centroids<R: Rng>(bounds: &Bounds, k: usize, rng: &mut R) -> Vec<Vec<f32>> {
    (0..k).map(|_| bounds.sample(rng)).collect()
}

/// Run k-means from a fresh random initialization.
///
/// Returns `(centroids, labels)`.
pub fn lloyd_iterate<R: Rng>(
    data: &[Vec<f32>],
    k: usize,
    max_iter: usize,
    rng: &mut R,
) -> Result<(Vec<Vec<f32>>, Vec<usize>)> {
    let fit = Kmeans::new(k).with_max_iter(max_iter).fit_with_rng(data, rng)?;
    Ok((fit.centroids, fit.labels))
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be at least 1",
        });
    }
    Ok(())
}

impl Kmeans {
    /// Create a k-means clusterer with `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set the maximum number of Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured iteration cap.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn make_rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }

    /// Fit using the configured seed.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let mut rng = self.make_rng();
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit using an explicit random source (the configured seed is ignored).
    pub fn fit_with_rng<R: Rng>(&self, data: &[Vec<f32>], rng: &mut R) -> Result<KmeansFit> {
        self.check_max_iter()?;
        util::validate_points(data)?;
        check_k(self.k)?;
        let bounds = Bounds::of(data)?;
        let centroids = draw_centroids(&bounds, self.k, rng);
        Ok(self.lloyd(data, &bounds, centroids, rng))
    }

    /// Run Lloyd's algorithm starting from caller-provided centroids.
    ///
    /// The number of clusters is taken from `centroids`; `rng` is only used to
    /// recover empty clusters.
    pub fn fit_from<R: Rng>(
        &self,
        data: &[Vec<f32>],
        centroids: Vec<Vec<f32>>,
        rng: &mut R,
    ) -> Result<KmeansFit> {
        self.check_max_iter()?;
        let d = util::validate_points(data)?;
        check_k(centroids.len())?;
        for c in &centroids {
            if c.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: c.len(),
                });
            }
        }
        let bounds = Bounds::of(data)?;
        Ok(self.lloyd(data, &bounds, centroids, rng))
    }

    fn check_max_iter(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    // `data` is validated, `bounds` is its box and `centroids` has matching
    // width.
    fn lloyd<R: Rng>(
        &self,
        data: &[Vec<f32>],
        bounds: &Bounds,
        mut centroids: Vec<Vec<f32>>,
        rng: &mut R,
    ) -> KmeansFit {
        let n = data.len();
        let k = centroids.len();
        let d = data[0].len();

        let mut labels = vec![0usize; n];
        let mut n_iter = 0;
        let mut converged = false;

        while n_iter < self.max_iter {
            n_iter += 1;
            let previous = centroids.clone();

            for (label, point) in labels.iter_mut().zip(data) {
                *label = util::nearest(point, &centroids).0;
            }

            let mut sums = vec![vec![0.0f64; d]; k];
            let mut counts = vec![0usize; k];
            for (point, &l) in data.iter().zip(&labels) {
                counts[l] += 1;
                for (s, &x) in sums[l].iter_mut().zip(point) {
                    *s += x as f64;
                }
            }

            for (j, centroid) in centroids.iter_mut().enumerate() {
                if counts[j] == 0 {
                    *centroid = bounds.sample(rng);
                    trace!(cluster = j, iteration = n_iter, "reinitialized empty cluster");
                } else {
                    let cnt = counts[j] as f64;
                    for (c, s) in centroid.iter_mut().zip(&sums[j]) {
                        *c = (s / cnt) as f32;
                    }
                }
            }

            if centroids == previous {
                converged = true;
                break;
            }
        }

        debug!(k, n, n_iter, converged, "k-means finished");

        KmeansFit {
            centroids,
            labels,
            n_iter,
            converged,
        }
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
