//! # Parks-McClellan Remez exchange engine
//!
//! The [`pm_firdes`](crate) crate implements the core of the Parks-McClellan
//! method for the design of linear-phase FIR filters: the weighted Chebyshev
//! approximation of a piecewise constant desired response over a set of
//! disjoint bands, solved with the Remez exchange algorithm on a dense
//! discretization of the frequency axis.
//!
//! The design proceeds as in \[1\] and \[2\]. The bands are sampled on a dense
//! [`Grid`]. An initial set of `r + 1` extremal frequencies, evenly spaced over
//! the grid, is used to build an interpolant with barycentric Lagrange
//! interpolation \[4\]. The weighted error of the interpolant is evaluated on
//! the grid, and its local extrema replace the extremal set, keeping exactly
//! `r + 1` of them with alternating signs. The iteration stops when the
//! extremal set no longer changes, or when an iteration cap is reached.
//!
//! The result of a design is the converged interpolant, which gives the
//! amplitude response of the filter at any frequency. Synthesis of the filter
//! taps from the amplitude response is not done by this crate.
//!
//! All the computations are generic over the scalar type. Besides `f64` and
//! `f32`, any type implementing the [`Float`] and [`FloatConst`] traits can be
//! used, such as
//! [`num-bigfloat`](https://docs.rs/num-bigfloat/latest/num_bigfloat/).
//!
//! ## Examples
//!
//! The main function of this crate is [`design`], which takes a
//! [`DesignParameters`] object defining the filter and returns a [`Design`].
//! The parameters can be given with a list of [`BandSetting`]s, each of which
//! holds a band together with its desired response and weight. This designs a
//! 35-tap lowpass filter with a stopband weight of 10.
//!
//! ```
//! # fn main() -> Result<(), pm_firdes::error::Error> {
//! use pm_firdes::{BandSetting, Design, design, remez_parameters};
//! let bands = [
//!     BandSetting::new(0.0, 0.2, 1.0)?,
//!     BandSetting::with_weight(0.3, 0.5, 0.0, 10.0)?,
//! ];
//! let parameters = remez_parameters(35, &bands)?;
//! let design: Design<f64> = design(&parameters)?;
//! assert!(design.status.is_converged());
//! assert!(design.weighted_error < 3e-3);
//! let passband_gain = design.frequency_response(0.1);
//! assert!((passband_gain - 1.0).abs() < 3e-3);
//! # Ok(())
//! # }
//! ```
//!
//! The same design can be described with [`RemezParameters`], which takes the
//! list of [`Band`]s, the desired responses and the weights separately. The
//! tunables of the Remez exchange can be changed with the methods of the
//! [`ParametersBuilder`] trait.
//!
//! ```
//! # fn main() -> Result<(), pm_firdes::error::Error> {
//! use pm_firdes::{Band, ParametersBuilder, RemezParameters, design};
//! let mut parameters = RemezParameters::new(
//!     35,
//!     vec![Band::new(0.0, 0.2)?, Band::new(0.3, 0.5)?],
//!     vec![1.0, 0.0],
//!     vec![1.0, 10.0],
//! )?;
//! parameters.set_grid_density(20).set_max_iterations(25);
//! let design = design(&parameters)?;
//! println!("{} iterations", design.num_iterations);
//! # Ok(())
//! # }
//! ```
//!
//! The Remez exchange can also be driven one iteration at a time with a
//! [`FilterDesigner`], and the progress of a design can be followed with an
//! [`Observer`](observer::Observer), such as the
//! [`LogObserver`](observer::LogObserver), which writes to the [`log`] facade.
//!
//! ## Features
//!
//! The `parallel` feature evaluates the weighted error on the grid using the
//! rayon thread pool. The results are the same as in the sequential
//! evaluation.
//!
//! The `num-bigfloat` feature adds no library code. It only enables the
//! optional `num-bigfloat` dependency, so that the test suite can run a design
//! with `BigFloat` scalars. The designer accepts `BigFloat` without the
//! feature, since it is generic over [`Float`] and [`FloatConst`].
//!
//! ## References
//!
//! \[1\] T. Parks and J. McClellan, "Chebyshev Approximation for Nonrecursive
//! Digital Filters with Linear Phase," in IEEE Transactions on Circuit Theory,
//! vol. 19, no. 2, pp. 189-194, March 1972.
//!
//! \[2\] J. McClellan, T. Parks and L. Rabiner, "A computer program for designing
//! optimum FIR linear phase digital filters," in IEEE Transactions on Audio and
//! Electroacoustics, vol. 21, no. 6, pp. 506-526, December 1973
//!
//! \[3\] L. Rabiner, J. McClellan and T. Parks, "FIR digital filter design
//! techniques using weighted Chebyshev approximation," in Proceedings of the
//! IEEE, vol. 63, no. 4, pp. 595-610, April 1975.
//!
//! \[4\] J.-P. Berrut and L.N. Trefethen, "Barycentric Lagrange Interpolation,"
//! SIAM Review, vol. 46, no. 3, pp. 501-517, 2004.
//!

#![warn(missing_docs)]

use num_traits::{Float, FloatConst};

mod bands;
mod barycentric;
pub use barycentric::ExtremalSet;
mod designer;
pub use designer::{Convergence, Design, DesignState, FilterDesigner};
pub mod error;
use error::Result;
mod error_curve;
pub use error_curve::MaybeSync;
mod exchange;
mod grid;
pub use grid::Grid;
pub mod observer;
use observer::Observer;
mod requirements;
pub use requirements::{BandSetting, remez_parameters};
mod types;
pub use types::{
    Band, BandType, DesignParameters, FilterSpec, ParametersBuilder, RemezParameters,
};

/// Parks-McClellan Remez exchange algorithm.
///
/// This function runs the Remez exchange algorithm to find the amplitude
/// response that minimizes the maximum weighted error in the bands of the
/// filter, according to the parameters given in the `parameters` argument.
///
/// The type parameter `T` represents the scalar used in all the computations.
/// The type parameter `P` represents the type of the design parameters. It
/// needs to implement the [`DesignParameters`] trait.
///
/// Reaching the iteration cap is not an error. The [`Design::status`] field
/// indicates whether the design converged.
///
/// # Examples
///
/// See the [crate-level examples](crate#examples).
pub fn design<T, P>(parameters: &P) -> Result<Design<T>>
where
    T: Float + FloatConst + MaybeSync,
    P: DesignParameters<T>,
{
    FilterDesigner::new(parameters)?.into_design()
}

/// Parks-McClellan Remez exchange algorithm with observer.
///
/// This function behaves like [`design`], but it additionally reports the
/// progress of the design to an [`Observer`].
pub fn design_with_observer<T, P, O>(parameters: &P, observer: &mut O) -> Result<Design<T>>
where
    T: Float + FloatConst + MaybeSync,
    P: DesignParameters<T>,
    O: Observer<T> + ?Sized,
{
    FilterDesigner::with_observer(parameters, observer)?.into_design()
}
