use thiserror::Error;

/// Errors returned by the clustering and Markov chain engines.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points (or centroids) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Matrix arguments have incompatible shapes.
    #[error("shape error: {0}")]
    Shape(&'static str),

    /// A numeric value lies outside its domain.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// An observation symbol is not a column of the emission matrix.
    #[error("observation[{index}] = {symbol} out of range (n_symbols = {n_symbols})")]
    InvalidSymbol {
        /// Position in the observation sequence.
        index: usize,
        /// Offending symbol.
        symbol: usize,
        /// Number of symbols the emission matrix defines.
        n_symbols: usize,
    },

    /// A probability vector or matrix row does not sum to 1.
    #[error("malformed {what}: row {row} sums to {sum}, expected ~1.0")]
    MalformedModel {
        /// Which model parameter failed.
        what: &'static str,
        /// Offending row (0 for vectors).
        row: usize,
        /// Observed sum.
        sum: f64,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
