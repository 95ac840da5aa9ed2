//! State propagation and steady state of a Markov chain.

use super::{check_distribution, check_transition};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

const STEADY_STATE_TOL: f64 = 1e-12;
const STEADY_STATE_MAX_ITER: usize = 10_000;

/// Distribution over states after `t` steps, starting from `s`: `s · Pᵗ`.
pub fn state_distribution(
    p: &ArrayView2<'_, f64>,
    s: &ArrayView1<'_, f64>,
    t: usize,
) -> Result<Array1<f64>> {
    let n = check_transition(p)?;
    if s.len() != n {
        return Err(Error::Shape("starting distribution length must match P"));
    }
    check_distribution(s, "starting distribution")?;
    if t == 0 {
        return Err(Error::InvalidParameter {
            name: "t",
            message: "must be at least 1",
        });
    }

    let mut dist = s.to_owned();
    for _ in 0..t {
        dist = dist.dot(p);
    }
    Ok(dist)
}

/// Whether some power of `P` has every entry strictly positive.
///
/// Only the sparsity pattern matters, so this is decided on booleans and
/// cannot be fooled by underflow. By Wielandt's bound it suffices to check
/// `P^m` for any `m >= (n - 1)² + 1`; once a power is positive every higher
/// power is too. The pattern is squared until the exponent passes the bound,
/// which takes `O(log n)` products.
pub fn is_regular(p: &ArrayView2<'_, f64>) -> Result<bool> {
    let n = check_transition(p)?;
    let bound = (n - 1) * (n - 1) + 1;

    let mut power: Array2<bool> = p.mapv(|x| x > 0.0);
    let mut exponent = 1usize;
    while exponent < bound {
        if power.iter().all(|&x| x) {
            return Ok(true);
        }
        power = bool_product(&power, &power);
        exponent *= 2;
    }
    Ok(power.iter().all(|&x| x))
}

fn bool_product(a: &Array2<bool>, b: &Array2<bool>) -> Array2<bool> {
    let n = a.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| (0..n).any(|k| a[[i, k]] && b[[k, j]]))
}

/// Stationary distribution of a regular chain, or `None` if `P` is not
/// regular.
///
/// Iterates `π ← πP` from the uniform distribution. A regular chain converges
/// to its unique stationary distribution from any start.
pub fn steady_state(p: &ArrayView2<'_, f64>) -> Result<Option<Array1<f64>>> {
    if !is_regular(p)? {
        return Ok(None);
    }
    let n = p.nrows();

    let mut pi = Array1::from_elem(n, 1.0 / n as f64);
    for _ in 0..STEADY_STATE_MAX_ITER {
        let next = pi.dot(p);
        let delta = next
            .iter()
            .zip(pi.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        pi = next;
        if delta < STEADY_STATE_TOL {
            return Ok(Some(pi));
        }
    }

    debug!(
        n,
        max_iter = STEADY_STATE_MAX_ITER,
        "steady state did not reach tolerance"
    );
    Ok(Some(pi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn weather() -> Array2<f64> {
        array![[0.6, 0.4], [0.3, 0.7]]
    }

    #[test]
    fn test_state_distribution_steps() {
        let p = weather();
        let s = array![1.0, 0.0];
        let one = state_distribution(&p.view(), &s.view(), 1).unwrap();
        assert!((one[0] - 0.6).abs() < 1e-12);
        assert!((one[1] - 0.4).abs() < 1e-12);

        let two = state_distribution(&p.view(), &s.view(), 2).unwrap();
        assert!((two[0] - 0.48).abs() < 1e-12);
        assert!((two[1] - 0.52).abs() < 1e-12);
    }

    #[test]
    fn test_state_distribution_rejects_bad_input() {
        let p = weather();
        let s = array![1.0, 0.0, 0.0];
        assert!(matches!(
            state_distribution(&p.view(), &s.view(), 1),
            Err(Error::Shape(_))
        ));
        let s = array![0.7, 0.7];
        assert!(matches!(
            state_distribution(&p.view(), &s.view(), 1),
            Err(Error::MalformedModel { .. })
        ));
        let s = array![1.0, 0.0];
        assert!(state_distribution(&p.view(), &s.view(), 0).is_err());
    }

    #[test]
    fn test_regularity() {
        assert!(is_regular(&weather().view()).unwrap());
        // Zero entries, but P² is positive.
        let p = array![[0.0, 1.0], [0.5, 0.5]];
        assert!(is_regular(&p.view()).unwrap());
        // Periodic.
        let p = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(!is_regular(&p.view()).unwrap());
        // Absorbing.
        let p = array![[1.0, 0.0], [0.4, 0.6]];
        assert!(!is_regular(&p.view()).unwrap());
    }

    /// `n` states on a cycle with one shortcut: primitive, and the first
    /// positive power is exactly Wielandt's bound.
    fn wielandt(n: usize) -> Array2<f64> {
        let mut p = Array2::<f64>::zeros((n, n));
        for i in 0..n - 1 {
            p[[i, i + 1]] = 1.0;
        }
        p[[n - 1, 0]] = 0.5;
        p[[n - 1, 1]] = 0.5;
        p
    }

    #[test]
    fn test_regularity_at_wielandt_bound() {
        for n in [3, 6, 9] {
            assert!(is_regular(&wielandt(n).view()).unwrap(), "n = {n}");
        }
        // Dropping the shortcut leaves a pure cycle, which is periodic.
        let mut p = wielandt(6);
        p[[5, 0]] = 1.0;
        p[[5, 1]] = 0.0;
        assert!(!is_regular(&p.view()).unwrap());
    }

    #[test]
    fn test_regularity_large_chain() {
        // Every state steps to the next; the last one absorbs.
        let n = 200;
        let mut p = Array2::<f64>::zeros((n, n));
        for i in 0..n - 1 {
            p[[i, i + 1]] = 1.0;
        }
        p[[n - 1, n - 1]] = 1.0;
        assert!(!is_regular(&p.view()).unwrap());

        let full = Array2::from_elem((n, n), 1.0 / n as f64);
        assert!(is_regular(&full.view()).unwrap());
    }

    #[test]
    fn test_steady_state_weather() {
        let p = weather();
        let pi = steady_state(&p.view()).unwrap().unwrap();
        assert!((pi[0] - 3.0 / 7.0).abs() < 1e-9);
        assert!((pi[1] - 4.0 / 7.0).abs() < 1e-9);

        // Fixed point of P.
        let next = pi.dot(&p);
        for (a, b) in next.iter().zip(pi.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_steady_state_not_regular() {
        let p = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(steady_state(&p.view()).unwrap().is_none());
    }

    #[test]
    fn test_steady_state_four_states() {
        let p = array![
            [0.25, 0.2, 0.25, 0.3],
            [0.2, 0.3, 0.2, 0.3],
            [0.25, 0.25, 0.4, 0.1],
            [0.3, 0.3, 0.1, 0.3],
        ];
        let pi = steady_state(&p.view()).unwrap().unwrap();
        assert!((pi.sum() - 1.0).abs() < 1e-9);
        let next = pi.dot(&p);
        for (a, b) in next.iter().zip(pi.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
