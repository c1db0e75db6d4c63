use crate::error::NumericalFault;
use crate::grid::Grid;
use num_traits::{Float, FloatConst};

/// Extremal set of the Remez exchange together with its interpolant.
///
/// The set holds `r + 1` strictly increasing indices into the frequencies of
/// a [`Grid`], the Chebyshev abscissas `x_k = cos(2 pi F[k])` of those
/// frequencies, the barycentric weights `alpha_k`, the interpolated values
/// `c_k` and the signed minimax error `rho`. The interpolant is the
/// trigonometric polynomial of degree `r` in `cos(2 pi f)` that passes
/// through the points `(x_k, c_k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremalSet<T> {
    indices: Vec<usize>,
    x: Vec<T>,
    alpha: Vec<T>,
    c: Vec<T>,
    rho: T,
}

impl<T: Float + FloatConst> ExtremalSet<T> {
    /// Computes the interpolant for a set of grid indices.
    ///
    /// The minimax error is
    ///
    /// `rho = sum_k alpha_k D_k / sum_k (-1)^k alpha_k / W_k`,
    ///
    /// and the interpolated values are `c_k = D_k - (-1)^k rho / W_k`, where
    /// `D_k` and `W_k` are the desired response and weight at the grid point
    /// of the `k`-th index.
    ///
    /// A fault is returned if the frequencies referenced by `indices` are not
    /// strictly increasing or the denominator of `rho` vanishes.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of the bounds of the grid.
    pub fn new(indices: Vec<usize>, grid: &Grid<T>) -> Result<ExtremalSet<T>, NumericalFault> {
        let x: Vec<T> = indices.iter().map(|&i| abscissa(grid.freqs()[i])).collect();
        // cos(2 pi f) is decreasing on [0, 0.5]
        if x.len() < 2 || x.windows(2).any(|w| w[0] <= w[1]) {
            return Err(NumericalFault::DuplicateAbscissas);
        }
        let alpha: Vec<T> = compute_barycentric_weights(&x).collect();
        let desired: Vec<T> = indices.iter().map(|&i| grid.desired()[i]).collect();
        let weights: Vec<T> = indices.iter().map(|&i| grid.weights()[i]).collect();
        let rho = compute_rho(&alpha, &desired, &weights).ok_or(NumericalFault::DegenerateRho)?;
        let c = compute_node_values(rho, &desired, &weights).collect();
        Ok(ExtremalSet {
            indices,
            x,
            alpha,
            c,
            rho,
        })
    }

    /// Evaluates the interpolant at the abscissa `x0 = cos(2 pi f)`.
    ///
    /// If `x0` is one of the interpolation nodes, the corresponding node value
    /// is returned.
    pub fn evaluate(&self, x0: T) -> T {
        compute_interpolant(x0, &self.x, &self.alpha, &self.c)
    }

    /// Evaluates the amplitude response `H(f)` of the interpolant at a
    /// frequency in cycles/sample.
    pub fn frequency_response(&self, freq: T) -> T {
        self.evaluate(abscissa(freq))
    }
}

impl<T: Copy> ExtremalSet<T> {
    /// Returns the grid indices of the extremal frequencies.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of points in the set, `r + 1`.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the set has no points.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the Chebyshev abscissas `cos(2 pi f)` of the extremal
    /// frequencies.
    pub fn abscissas(&self) -> &[T] {
        &self.x
    }

    /// Returns the barycentric weights.
    pub fn barycentric_weights(&self) -> &[T] {
        &self.alpha
    }

    /// Returns the values of the interpolant at the abscissas.
    pub fn node_values(&self) -> &[T] {
        &self.c
    }

    /// Returns the signed minimax error.
    pub fn rho(&self) -> T {
        self.rho
    }
}

// Chebyshev abscissa of a frequency in cycles/sample.
//
// Nodes and grid points must both go through this function, so that
// evaluating the interpolant at a node hits the exact-node case.
pub fn abscissa<T: Float + FloatConst>(freq: T) -> T {
    (T::TAU() * freq).cos()
}

// Barycentric weights
//
// alpha_k = 1 / prod_{j != k} (x_k - x_j).
//
// Each factor is doubled to keep the product away from underflow; the
// interpolation formula is homogeneous in the weights, so a common scale
// does not matter. The product is accumulated with a stride, which mixes
// near and far factors and keeps the partial products in range.
pub fn compute_barycentric_weights<T: Float>(x: &[T]) -> impl Iterator<Item = T> + '_ {
    let stride = x.len().saturating_sub(2) / 15 + 1;
    let two = T::from(2).unwrap();
    x.iter().enumerate().map(move |(k, &xk)| {
        let mut prod = T::one();
        for a in 0..stride {
            for j in (a..x.len()).step_by(stride) {
                if j != k {
                    prod = prod * ((xk - x[j]) * two);
                }
            }
        }
        prod.recip()
    })
}

// Calculate rho
//
// rho = sum_k alpha_k D_k / sum_k (-1)^k alpha_k / W_k.
//
// Returns None if the denominator is negligible compared to its terms.
pub fn compute_rho<T: Float>(alpha: &[T], desired: &[T], weights: &[T]) -> Option<T> {
    let mut numer = T::zero();
    let mut denom = T::zero();
    let mut denom_abs = T::zero();
    for (k, ((&a, &des), &wei)) in alpha
        .iter()
        .zip(desired.iter())
        .zip(weights.iter())
        .enumerate()
    {
        numer = numer + a * des;
        let z = a / wei;
        denom_abs = denom_abs + z.abs();
        if k % 2 != 0 {
            denom = denom - z;
        } else {
            denom = denom + z;
        }
    }
    let rho = numer / denom;
    if denom.abs() <= T::epsilon() * denom_abs || !rho.is_finite() {
        None
    } else {
        Some(rho)
    }
}

// Calculate c_k, the values of the interpolant at the nodes
//
// c_k = D_k - (-1)^k rho / W_k
//
// where W_k is the weight at the k-th extremal point.
pub fn compute_node_values<'a, T: Float>(
    rho: T,
    desired: &'a [T],
    weights: &'a [T],
) -> impl Iterator<Item = T> + 'a {
    desired
        .iter()
        .zip(weights.iter())
        .enumerate()
        .map(move |(k, (&des, &wei))| {
            let z = rho / wei;
            if k % 2 != 0 { des + z } else { des - z }
        })
}

// Evaluate the barycentric interpolant at x0
pub fn compute_interpolant<T: Float>(x0: T, x: &[T], alpha: &[T], c: &[T]) -> T {
    let mut numer = T::zero();
    let mut denom = T::zero();
    for ((&xk, &a), &ck) in x.iter().zip(alpha.iter()).zip(c.iter()) {
        let diff = x0 - xk;
        if diff == T::zero() {
            // evaluating at one of the interpolation nodes
            return ck;
        }
        let z = a / diff;
        numer = numer + z * ck;
        denom = denom + z;
    }
    numer / denom
}
