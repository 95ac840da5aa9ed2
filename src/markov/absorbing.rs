//! Absorbing Markov chains.
//!
//! A state `i` is absorbing when `P[[i, i]] == 1`: once entered it is never
//! left. A chain is absorbing when it has at least one absorbing state and
//! every state can reach some absorbing state in finitely many steps.
//!
//! Reachability is computed backwards from the absorbing states: state `i`
//! reaches the absorbing set if `P[[i, j]] > 0` for some `j` already known to
//! reach it. The closure is iterated to a fixed point, so arbitrarily long
//! detours through transient states are followed.

use super::check_transition;
use crate::error::Result;
use ndarray::ArrayView2;
use tracing::debug;

/// Indices of the absorbing states of a validated transition matrix.
pub fn absorbing_states(p: &ArrayView2<'_, f64>) -> Result<Vec<usize>> {
    check_transition(p)?;
    Ok(diagonal_ones(p))
}

fn diagonal_ones(p: &ArrayView2<'_, f64>) -> Vec<usize> {
    p.diag()
        .iter()
        .enumerate()
        .filter(|(_, x)| **x == 1.0)
        .map(|(i, _)| i)
        .collect()
}

/// Whether the chain is absorbing, with malformed input reported as an error.
pub fn check_absorbing(p: &ArrayView2<'_, f64>) -> Result<bool> {
    let n = check_transition(p)?;
    let absorbing = diagonal_ones(p);

    if absorbing.is_empty() {
        return Ok(false);
    }
    if absorbing.len() == n {
        return Ok(true);
    }

    let mut reaches = vec![false; n];
    for &a in &absorbing {
        reaches[a] = true;
    }
    let mut frontier = absorbing;
    let mut known = frontier.len();

    while let Some(target) = frontier.pop() {
        for (i, &prob) in p.column(target).iter().enumerate() {
            if prob > 0.0 && !reaches[i] {
                reaches[i] = true;
                known += 1;
                frontier.push(i);
            }
        }
        if known == n {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Whether the chain is absorbing.
///
/// Fails closed: a malformed matrix (not square, rows not summing to 1) is
/// reported as `false`. Use [`check_absorbing`] to tell the two apart.
pub fn classify_absorbing(p: &ArrayView2<'_, f64>) -> bool {
    match check_absorbing(p) {
        Ok(absorbing) => absorbing,
        Err(e) => {
            debug!(error = %e, "absorbing classification failed closed");
            false
        }
    }
}
