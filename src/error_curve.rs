use crate::barycentric::ExtremalSet;
use crate::grid::Grid;
use num_traits::{Float, FloatConst};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Thread-safety requirement on the scalar type.
///
/// With the `parallel` feature the weighted error curve is evaluated on the
/// rayon thread pool, so the scalar type must be [`Send`] and [`Sync`]. Without
/// the feature this trait is implemented by every type. It is blanket
/// implemented, so it never needs to be implemented by hand.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Send + Sync {}

#[cfg(feature = "parallel")]
impl<T: Send + Sync> MaybeSync for T {}

/// Thread-safety requirement on the scalar type.
///
/// With the `parallel` feature the weighted error curve is evaluated on the
/// rayon thread pool, so the scalar type must be [`Send`] and [`Sync`]. Without
/// the feature this trait is implemented by every type. It is blanket
/// implemented, so it never needs to be implemented by hand.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}

#[cfg(not(feature = "parallel"))]
impl<T> MaybeSync for T {}

// Compute E(f) = W(f) * (D(f) - H(f)) on every grid point.
//
// Each grid point only writes its own slot of the error column. The whole
// column is written when this function returns.
pub fn evaluate_errors<T>(grid: &mut Grid<T>, extremal: &ExtremalSet<T>)
where
    T: Float + FloatConst + MaybeSync,
{
    let (freqs, desired, weights, errors) = grid.columns_mut();
    fill_errors(freqs, desired, weights, errors, extremal);
}

#[cfg(not(feature = "parallel"))]
fn fill_errors<T: Float + FloatConst>(
    freqs: &[T],
    desired: &[T],
    weights: &[T],
    errors: &mut [T],
    extremal: &ExtremalSet<T>,
) {
    for (((e, &f), &d), &w) in errors
        .iter_mut()
        .zip(freqs.iter())
        .zip(desired.iter())
        .zip(weights.iter())
    {
        *e = weighted_error(f, d, w, extremal);
    }
}

#[cfg(feature = "parallel")]
fn fill_errors<T: Float + FloatConst + Send + Sync>(
    freqs: &[T],
    desired: &[T],
    weights: &[T],
    errors: &mut [T],
    extremal: &ExtremalSet<T>,
) {
    errors
        .par_iter_mut()
        .zip(freqs.par_iter())
        .zip(desired.par_iter())
        .zip(weights.par_iter())
        .for_each(|(((e, &f), &d), &w)| *e = weighted_error(f, d, w, extremal));
}

fn weighted_error<T: Float + FloatConst>(
    freq: T,
    desired: T,
    weight: T,
    extremal: &ExtremalSet<T>,
) -> T {
    weight * (desired - extremal.frequency_response(freq))
}
