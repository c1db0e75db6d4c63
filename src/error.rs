//! Error types used by `pm_firdes`.

use std::collections::TryReserveError;
use thiserror::Error;

/// `pm_firdes` `Result` type.
pub type Result<T> = core::result::Result<T, Error>;

/// `pm_firdes` error.
///
/// This enum represents all the errors that can be produced by `pm_firdes`.
/// Errors are grouped by the stage that detects them: malformed inputs are
/// rejected before the frequency grid is built, numerical faults stop the
/// Remez exchange at the iteration where they appear, and resource errors
/// are reported when the grid or extremal buffers cannot be allocated.
#[derive(Error, Debug)]
pub enum Error {
    /// The filter description is malformed.
    #[error("invalid filter specification: {0}")]
    Validation(ValidationError),
    /// The Remez exchange hit a numerical fault and cannot continue.
    ///
    /// The iteration number is 1-based. The design is deterministic, so
    /// running it again with the same parameters reproduces the fault.
    #[error("numerical fault at iteration {iteration}: {fault}")]
    Numerical {
        /// Iteration at which the fault was detected.
        iteration: usize,
        /// Reason for the fault.
        fault: NumericalFault,
    },
    /// A buffer for the grid or the extremal set could not be allocated.
    #[error("unable to allocate design buffers: {0}")]
    Resource(#[from] TryReserveError),
}

/// Invalid filter specification error.
///
/// This enum classifies the ways in which the inputs to the design can be
/// malformed. All of them are detected before any grid or extremal set
/// computation takes place.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValidationError {
    /// The list of bands is empty.
    #[error("the list of bands is empty")]
    BandsEmpty,
    /// The begin of the band is not smaller than the end of the band.
    #[error("band begin is not smaller than band end")]
    BandLimitsWrongOrder,
    /// The band limits are not finite or lie outside [0.0, 0.5].
    #[error("band limits out of bounds")]
    BandLimitsOutOfBounds,
    /// The bands overlap, touch or are not sorted in increasing frequency.
    #[error("bands overlap or are not sorted")]
    BandsOverlap,
    /// A band weight is zero, negative or not finite.
    #[error("band weights must be positive")]
    NonPositiveWeight,
    /// A desired response value is not finite.
    #[error("desired response must be finite")]
    NonFiniteDesired,
    /// The number of desired response values or weights does not match the
    /// number of bands.
    #[error("expected {expected} values (one per band), got {got}")]
    ValueCountMismatch {
        /// Number of bands.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },
    /// The filter length does not give at least one approximating function.
    #[error("filter length must be at least 1")]
    FilterTooShort,
    /// The grid density is zero.
    #[error("grid density must be at least 1")]
    GridDensityZero,
    /// The iteration cap is zero.
    #[error("maximum number of iterations must be at least 1")]
    MaxIterationsZero,
}

/// Numerical fault.
///
/// This enum lists the conditions under which the Remez exchange cannot
/// produce a valid extremal set.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NumericalFault {
    /// The denominator in the computation of the minimax error is zero or not
    /// finite.
    #[error("degenerate denominator in minimax error computation")]
    DegenerateRho,
    /// Two interpolation abscissas coincide or are out of order.
    #[error("duplicate interpolation abscissas")]
    DuplicateAbscissas,
    /// The error curve has fewer local extrema than the size of the extremal
    /// set.
    ///
    /// This is typically caused by a grid that is too sparse or by
    /// pathological weighting.
    #[error("not enough error extrema found ({found} found, {needed} needed)")]
    NotEnoughExtrema {
        /// Number of candidate extrema found.
        found: usize,
        /// Number of extrema required.
        needed: usize,
    },
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Error {
        Error::Validation(value)
    }
}
