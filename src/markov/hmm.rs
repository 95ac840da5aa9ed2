//! Discrete hidden Markov models: forward, backward, and Viterbi.
//!
//! The model is `(E, A, π)`:
//! - `E` (`N × M`): `E[[i, k]] = P(symbol k | state i)`
//! - `A` (`N × N`): `A[[i, j]] = P(state j at t+1 | state i at t)`
//! - `π` (`N`): distribution of the first hidden state
//!
//! # Forward recurrence
//!
//! ```text
//! F[s, 0] = π[s] · E[s, o_0]
//! F[s, t] = (Σ_p F[p, t-1] · A[p, s]) · E[s, o_t]
//! P(o)    = Σ_s F[s, T-1]
//! ```
//!
//! Trellises are kept in probability space so that they are exactly the
//! quantities above. Very long sequences will underflow to zero.
//!
//! Parameters are validated once when an [`Hmm`] is built; observation
//! sequences are validated on every call.

use super::{check_distribution, check_stochastic_rows};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// A discrete HMM with validated parameters.
#[derive(Debug, Clone)]
pub struct Hmm {
    /// `N × M` emission probabilities.
    emission: Array2<f64>,
    /// `N × N` transition probabilities.
    transition: Array2<f64>,
    /// Length-`N` initial state distribution.
    initial: Array1<f64>,
}

impl Hmm {
    /// Build a model after checking shapes and the stochastic constraint.
    ///
    /// # Errors
    ///
    /// - [`Error::Shape`] if `emission` has no rows or columns, `transition`
    ///   is not `N × N`, or `initial` is not length `N`
    /// - [`Error::MalformedModel`] if a row of `emission` or `transition`, or
    ///   `initial` itself, does not sum to 1
    /// - [`Error::Domain`] on negative or non-finite probabilities
    pub fn new(
        emission: Array2<f64>,
        transition: Array2<f64>,
        initial: Array1<f64>,
    ) -> Result<Self> {
        validate_model(&emission.view(), &transition.view(), &initial.view())?;
        Ok(Self {
            emission,
            transition,
            initial,
        })
    }

    /// Number of hidden states `N`.
    pub fn n_states(&self) -> usize {
        self.emission.nrows()
    }

    /// Number of observable symbols `M`.
    pub fn n_symbols(&self) -> usize {
        self.emission.ncols()
    }

    /// Forward algorithm.
    ///
    /// Returns `(likelihood, F)` with `F` of shape `N × T`.
    pub fn forward(&self, observations: &[usize]) -> Result<(f64, Array2<f64>)> {
        validate_observations(observations, self.n_symbols())?;
        Ok(forward_unchecked(
            observations,
            &self.emission.view(),
            &self.transition.view(),
            &self.initial.view(),
        ))
    }

    /// Backward algorithm.
    ///
    /// Returns `(likelihood, B)` with `B` of shape `N × T`, where `B[[s, t]]`
    /// is the probability of `o_{t+1..T}` given state `s` at time `t`. The
    /// likelihood equals the one from [`forward`](Self::forward).
    pub fn backward(&self, observations: &[usize]) -> Result<(f64, Array2<f64>)> {
        validate_observations(observations, self.n_symbols())?;

        let n = self.n_states();
        let t_len = observations.len();
        let e = &self.emission;
        let a = &self.transition;

        let mut b = Array2::<f64>::zeros((n, t_len));
        b.column_mut(t_len - 1).fill(1.0);

        for t in (0..t_len - 1).rev() {
            let next = observations[t + 1];
            for s in 0..n {
                b[[s, t]] = (0..n)
                    .map(|j| a[[s, j]] * e[[j, next]] * b[[j, t + 1]])
                    .sum();
            }
        }

        let o0 = observations[0];
        let likelihood = (0..n)
            .map(|s| self.initial[s] * e[[s, o0]] * b[[s, 0]])
            .sum();

        Ok((likelihood, b))
    }

    /// Viterbi decoding.
    ///
    /// Returns the most likely hidden-state path and its joint probability
    /// with the observations. Ties go to the lowest state index.
    pub fn viterbi(&self, observations: &[usize]) -> Result<(Vec<usize>, f64)> {
        validate_observations(observations, self.n_symbols())?;

        let n = self.n_states();
        let t_len = observations.len();
        let e = &self.emission;
        let a = &self.transition;

        let mut v = Array2::<f64>::zeros((n, t_len));
        let mut back = Array2::<usize>::zeros((n, t_len));

        let o0 = observations[0];
        for s in 0..n {
            v[[s, 0]] = self.initial[s] * e[[s, o0]];
        }

        for t in 1..t_len {
            let ot = observations[t];
            for s in 0..n {
                let mut best = 0;
                let mut best_val = f64::NEG_INFINITY;
                for p in 0..n {
                    let cand = v[[p, t - 1]] * a[[p, s]];
                    if cand > best_val {
                        best_val = cand;
                        best = p;
                    }
                }
                v[[s, t]] = best_val * e[[s, ot]];
                back[[s, t]] = best;
            }
        }

        let mut last = 0;
        let mut prob = f64::NEG_INFINITY;
        for s in 0..n {
            if v[[s, t_len - 1]] > prob {
                prob = v[[s, t_len - 1]];
                last = s;
            }
        }

        let mut path = vec![0usize; t_len];
        path[t_len - 1] = last;
        for t in (1..t_len).rev() {
            path[t - 1] = back[[path[t], t]];
        }

        Ok((path, prob))
    }
}

/// Forward algorithm over borrowed parameters.
///
/// Validates every argument (see [`Hmm::new`]) and the observation sequence
/// before running the recurrence. Returns `(likelihood, F)`.
pub fn forward_algorithm(
    observation: &[usize],
    emission: &ArrayView2<'_, f64>,
    transition: &ArrayView2<'_, f64>,
    initial: &ArrayView1<'_, f64>,
) -> Result<(f64, Array2<f64>)> {
    validate_model(emission, transition, initial)?;
    validate_observations(observation, emission.ncols())?;
    Ok(forward_unchecked(observation, emission, transition, initial))
}

fn forward_unchecked(
    observations: &[usize],
    e: &ArrayView2<'_, f64>,
    a: &ArrayView2<'_, f64>,
    initial: &ArrayView1<'_, f64>,
) -> (f64, Array2<f64>) {
    let n = e.nrows();
    let t_len = observations.len();
    let mut f = Array2::<f64>::zeros((n, t_len));

    let o0 = observations[0];
    for s in 0..n {
        f[[s, 0]] = initial[s] * e[[s, o0]];
    }

    for t in 1..t_len {
        let ot = observations[t];
        for s in 0..n {
            let reach: f64 = (0..n).map(|p| f[[p, t - 1]] * a[[p, s]]).sum();
            f[[s, t]] = reach * e[[s, ot]];
        }
    }

    let likelihood = f.column(t_len - 1).sum();
    (likelihood, f)
}

fn validate_model(
    emission: &ArrayView2<'_, f64>,
    transition: &ArrayView2<'_, f64>,
    initial: &ArrayView1<'_, f64>,
) -> Result<()> {
    let (n, m) = emission.dim();
    if n == 0 || m == 0 {
        return Err(Error::Shape("emission must have at least one state and one symbol"));
    }
    if transition.dim() != (n, n) {
        return Err(Error::Shape("transition must be N x N, N = emission rows"));
    }
    if initial.len() != n {
        return Err(Error::Shape("initial must have length N, N = emission rows"));
    }
    check_stochastic_rows(emission, "emission")?;
    check_stochastic_rows(transition, "transition")?;
    check_distribution(initial, "initial")?;
    Ok(())
}

fn validate_observations(observations: &[usize], n_symbols: usize) -> Result<()> {
    if observations.is_empty() {
        return Err(Error::EmptyInput);
    }
    for (index, &symbol) in observations.iter().enumerate() {
        if symbol >= n_symbols {
            return Err(Error::InvalidSymbol {
                index,
                symbol,
                n_symbols,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_state() -> Hmm {
        Hmm::new(
            array![[0.9, 0.1], [0.2, 0.8]],
            array![[0.7, 0.3], [0.3, 0.7]],
            array![0.5, 0.5],
        )
        .unwrap()
    }

    /// Occasionally dishonest casino: fair die vs. one loaded toward six.
    fn casino() -> Hmm {
        let mut emission = Array2::from_elem((2, 6), 1.0 / 6.0);
        emission.row_mut(1).fill(0.1);
        emission[[1, 5]] = 0.5;
        Hmm::new(
            emission,
            array![[0.95, 0.05], [0.10, 0.90]],
            array![0.5, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn test_forward_single_observation() {
        let (p, f) = two_state().forward(&[0]).unwrap();
        assert_eq!(f.dim(), (2, 1));
        assert!((f[[0, 0]] - 0.45).abs() < 1e-12);
        assert!((f[[1, 0]] - 0.10).abs() < 1e-12);
        assert!((p - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_forward_two_steps_by_hand() {
        let (p, f) = two_state().forward(&[0, 1]).unwrap();
        // (0.45 * 0.7 + 0.10 * 0.3) * 0.1
        assert!((f[[0, 1]] - 0.0345).abs() < 1e-12);
        // (0.45 * 0.3 + 0.10 * 0.7) * 0.8
        assert!((f[[1, 1]] - 0.164).abs() < 1e-12);
        assert!((p - 0.1985).abs() < 1e-12);
    }

    #[test]
    fn test_forward_algorithm_matches_model() {
        let e = array![[0.9, 0.1], [0.2, 0.8]];
        let a = array![[0.7, 0.3], [0.3, 0.7]];
        let pi = array![0.5, 0.5];
        let obs = [0, 1, 1, 0, 1];
        let (p_fn, f_fn) = forward_algorithm(&obs, &e.view(), &a.view(), &pi.view()).unwrap();
        let (p_m, f_m) = two_state().forward(&obs).unwrap();
        assert_eq!(p_fn, p_m);
        assert_eq!(f_fn, f_m);
    }

    #[test]
    fn test_likelihood_sums_to_one_over_sequences() {
        // Summing P(o) over every length-3 sequence gives 1.
        let model = two_state();
        let mut total = 0.0;
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    total += model.forward(&[a, b, c]).unwrap().0;
                }
            }
        }
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_forward_backward_agree() {
        let model = casino();
        let obs = [0, 2, 5, 5, 5, 1, 5, 3];
        let (pf, f) = model.forward(&obs).unwrap();
        let (pb, b) = model.backward(&obs).unwrap();
        assert!((pf - pb).abs() < 1e-12 * pf);

        // Σ_s F[s,t]·B[s,t] is the likelihood at every t.
        for t in 0..obs.len() {
            let at_t: f64 = (0..2).map(|s| f[[s, t]] * b[[s, t]]).sum();
            assert!((at_t - pf).abs() < 1e-12 * pf);
        }
    }

    #[test]
    fn test_backward_last_column_is_one() {
        let (_, b) = two_state().backward(&[1, 0, 1]).unwrap();
        assert_eq!(b[[0, 2]], 1.0);
        assert_eq!(b[[1, 2]], 1.0);
        // Σ_j A[0,j]·E[j,1]
        assert!((b[[0, 1]] - (0.7 * 0.1 + 0.3 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_viterbi_by_hand() {
        let (path, p) = two_state().viterbi(&[0, 1]).unwrap();
        assert_eq!(path, vec![0, 1]);
        // 0.45 * 0.3 * 0.8
        assert!((p - 0.108).abs() < 1e-12);
    }

    #[test]
    fn test_viterbi_detects_loaded_run() {
        let model = casino();
        let obs = [0, 2, 3, 1, 4, 0, 5, 5, 5, 5, 5, 5, 2, 1, 0, 3];
        let (path, p) = model.viterbi(&obs).unwrap();
        assert_eq!(path.len(), obs.len());
        assert!(p > 0.0);
        let loaded = (6..12).filter(|&t| path[t] == 1).count();
        assert!(loaded >= 4, "expected the run of sixes to decode as loaded, got {loaded}");
    }

    #[test]
    fn test_viterbi_not_above_likelihood() {
        let model = casino();
        let obs = [5, 5, 0, 1, 5];
        let (_, best) = model.viterbi(&obs).unwrap();
        let (total, _) = model.forward(&obs).unwrap();
        assert!(best <= total);
    }

    #[test]
    fn test_observation_errors() {
        let model = two_state();
        assert!(matches!(model.forward(&[]), Err(Error::EmptyInput)));
        assert!(matches!(model.backward(&[]), Err(Error::EmptyInput)));
        assert!(matches!(model.viterbi(&[]), Err(Error::EmptyInput)));
        assert!(matches!(
            model.forward(&[0, 1, 2]),
            Err(Error::InvalidSymbol { index: 2, symbol: 2, n_symbols: 2 })
        ));
    }

    #[test]
    fn test_shape_errors() {
        let e = array![[0.9, 0.1], [0.2, 0.8]];
        let a3 = Array2::<f64>::eye(3);
        let pi = array![0.5, 0.5];
        assert!(matches!(
            forward_algorithm(&[0], &e.view(), &a3.view(), &pi.view()),
            Err(Error::Shape(_))
        ));

        let a = array![[0.7, 0.3], [0.3, 0.7]];
        let pi3 = array![0.2, 0.3, 0.5];
        assert!(matches!(
            forward_algorithm(&[0], &e.view(), &a.view(), &pi3.view()),
            Err(Error::Shape(_))
        ));

        let empty = Array2::<f64>::zeros((0, 2));
        assert!(Hmm::new(empty, Array2::zeros((0, 0)), Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_malformed_model() {
        let bad_e = array![[0.9, 0.2], [0.2, 0.8]];
        let a = array![[0.7, 0.3], [0.3, 0.7]];
        let pi = array![0.5, 0.5];
        assert!(matches!(
            Hmm::new(bad_e, a.clone(), pi.clone()),
            Err(Error::MalformedModel { what: "emission", row: 0, .. })
        ));

        let e = array![[0.9, 0.1], [0.2, 0.8]];
        let bad_pi = array![0.6, 0.6];
        assert!(matches!(
            Hmm::new(e, a, bad_pi),
            Err(Error::MalformedModel { what: "initial", .. })
        ));
    }
}
