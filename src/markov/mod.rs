//! Discrete-time Markov chains and discrete hidden Markov models.
//!
//! Conventions:
//! - Transition matrices are row-stochastic: `P[[i, j]]` is the probability of
//!   moving from state `i` to state `j`.
//! - Distributions are row vectors and evolve on the left: `s_{t+1} = s_t P`.
//! - Emission matrices are `N × M`: `E[[i, k]]` is the probability of emitting
//!   symbol `k` from hidden state `i`.
//!
//! Every entry point validates shapes and the stochastic constraint before
//! computing anything. Rows must sum to 1 within [`ROW_SUM_TOL`].
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use unsup::markov::{classify_absorbing, forward_algorithm};
//!
//! let p = array![[1.0, 0.0], [0.4, 0.6]];
//! assert!(classify_absorbing(&p.view()));
//!
//! let emission = array![[0.9, 0.1], [0.2, 0.8]];
//! let transition = array![[0.7, 0.3], [0.3, 0.7]];
//! let initial = array![0.5, 0.5];
//! let (likelihood, trellis) =
//!     forward_algorithm(&[0], &emission.view(), &transition.view(), &initial.view()).unwrap();
//! assert!((likelihood - 0.55).abs() < 1e-12);
//! assert_eq!(trellis.dim(), (2, 1));
//! ```

mod absorbing;
mod chain;
mod hmm;

pub use absorbing::{absorbing_states, check_absorbing, classify_absorbing};
pub use chain::{is_regular, state_distribution, steady_state};
pub use hmm::{forward_algorithm, Hmm};

use crate::error::{Error, Result};
use ndarray::{ArrayView1, ArrayView2};

/// Tolerance on probability row sums.
pub const ROW_SUM_TOL: f64 = 1e-5;

/// Check that `p` is a non-empty square matrix and return its size.
pub(crate) fn check_square(p: &ArrayView2<'_, f64>) -> Result<usize> {
    let n = p.nrows();
    if p.ncols() != n {
        return Err(Error::Shape("transition matrix must be square"));
    }
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(n)
}

/// Check that every row of `m` is a probability distribution.
pub(crate) fn check_stochastic_rows(m: &ArrayView2<'_, f64>, what: &'static str) -> Result<()> {
    for (row, values) in m.outer_iter().enumerate() {
        check_row(&values, what, row)?;
    }
    Ok(())
}

/// Check that `v` is a probability distribution.
pub(crate) fn check_distribution(v: &ArrayView1<'_, f64>, what: &'static str) -> Result<()> {
    check_row(v, what, 0)
}

fn check_row(values: &ArrayView1<'_, f64>, what: &'static str, row: usize) -> Result<()> {
    if values.iter().any(|&x| !x.is_finite() || x < 0.0) {
        return Err(Error::Domain("probabilities must be finite and non-negative"));
    }
    let sum = values.sum();
    if (sum - 1.0).abs() > ROW_SUM_TOL {
        return Err(Error::MalformedModel { what, row, sum });
    }
    Ok(())
}

/// Validate a transition matrix and return its size.
pub(crate) fn check_transition(p: &ArrayView2<'_, f64>) -> Result<usize> {
    let n = check_square(p)?;
    check_stochastic_rows(p, "transition")?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_check_transition_accepts_stochastic() {
        let p = array![[0.25, 0.75], [1.0, 0.0]];
        assert_eq!(check_transition(&p.view()).unwrap(), 2);
    }

    #[test]
    fn test_check_transition_tolerance() {
        let p = array![[0.5, 0.500001], [0.3, 0.7]];
        assert!(check_transition(&p.view()).is_ok());
        let p = array![[0.5, 0.51], [0.3, 0.7]];
        assert!(matches!(
            check_transition(&p.view()),
            Err(Error::MalformedModel { row: 0, .. })
        ));
    }

    #[test]
    fn test_check_transition_shape() {
        let p = array![[0.5, 0.5, 0.0], [0.3, 0.7, 0.0]];
        assert!(matches!(check_transition(&p.view()), Err(Error::Shape(_))));
        let p = ndarray::Array2::<f64>::zeros((0, 0));
        assert!(matches!(check_transition(&p.view()), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_check_row_rejects_negative() {
        let v = array![1.5, -0.5];
        assert!(matches!(
            check_distribution(&v.view(), "initial"),
            Err(Error::Domain(_))
        ));
    }
}
