//! Unsupervised inference primitives.
//!
//! `unsup` bundles two small, independent numeric engines:
//!
//! - [`cluster`]: k-means (uniform bounding-box seeding, Lloyd iterations with
//!   empty-cluster recovery), total intra-cluster variance, and a k sweep.
//! - [`markov`]: discrete Markov chains (absorbing classification, state
//!   propagation, steady state) and discrete HMM inference (forward,
//!   backward, Viterbi).
//!
//! Neither engine trains model parameters; Markov/HMM routines consume
//! already-estimated matrices.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod markov;

pub use cluster::{
    initialize_centroids, lloyd_iterate, optimum_k, total_variance, Clustering, KSweepEntry,
    Kmeans, KmeansFit,
};
pub use error::{Error, Result};
pub use markov::{
    absorbing_states, check_absorbing, classify_absorbing, forward_algorithm, is_regular,
    state_distribution, steady_state, Hmm,
};
