//! Partition clustering for dense vectors.
//!
//! ## K-means
//!
//! Assign each point to the nearest centroid, then move each centroid to the
//! mean of its points. Repeat until nothing moves.
//!
//! **Objective**: minimize the within-cluster sum of squares, which is exactly
//! what [`total_variance`] reports for a finished clustering:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance (or sweep it with [`optimum_k`])
//!
//! ## Usage
//!
//! ```rust
//! use unsup::cluster::{total_variance, Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let fit = Kmeans::new(2).with_seed(42).fit(&data).unwrap();
//! assert_eq!(fit.labels[0], fit.labels[1]);
//! assert_ne!(fit.labels[0], fit.labels[2]);
//!
//! let v = total_variance(&data, &fit.centroids).unwrap();
//! assert!(v < 0.1);
//!
//! // Trait-style use.
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), 4);
//! ```

mod kmeans;
mod sweep;
mod traits;
mod util;
mod variance;

pub use kmeans::{initialize_centroids, lloyd_iterate, Kmeans, KmeansFit, DEFAULT_MAX_ITER};
pub use sweep::{optimum_k, KSweepEntry};
pub use traits::Clustering;
pub use variance::total_variance;
