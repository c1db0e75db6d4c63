use crate::error::Result;
use crate::types::{Band, FilterSpec};
use num_traits::Float;
use std::ops::Range;

/// Dense frequency grid.
///
/// The grid samples all the bands of a [`FilterSpec`] with a uniform spacing,
/// except that the last point of each band is moved to the upper band edge.
/// Each point carries the frequency (in cycles/sample), the desired response,
/// the weight and the signed weighted error `E = W * (D - H)` of the current
/// interpolant. Only the error is updated during the Remez exchange.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    freqs: Vec<T>,
    desired: Vec<T>,
    weights: Vec<T>,
    errors: Vec<T>,
    band_ends: Vec<usize>,
    spacing: T,
}

impl<T: Float> Grid<T> {
    /// Builds the grid for a filter specification.
    ///
    /// The grid spacing is `0.5 / (grid_density * r)`, where `r` is the number
    /// of approximating functions. Each band `[f0, f1]` gets
    /// `max(1, round((f1 - f0) / spacing))` points placed at `f0 + j * spacing`,
    /// and the last of them is set to `f1`.
    ///
    /// `grid_density` must be nonzero. An error is returned if the grid
    /// buffers cannot be allocated.
    pub fn new(spec: &FilterSpec<T>, grid_density: usize) -> Result<Grid<T>> {
        debug_assert!(grid_density > 0);
        let spacing = T::from(0.5).unwrap()
            / (T::from(grid_density).unwrap() * T::from(spec.num_functions()).unwrap());
        let counts: Vec<usize> = spec
            .bands()
            .iter()
            .map(|band| band_points(band, spacing))
            .collect();
        let grid_size = counts.iter().sum();

        let mut freqs = reserve(grid_size)?;
        let mut desired = reserve(grid_size)?;
        let mut weights = reserve(grid_size)?;
        let mut errors = reserve(grid_size)?;
        let mut band_ends = reserve(counts.len())?;
        for (((band, &count), &des), &wei) in spec
            .bands()
            .iter()
            .zip(counts.iter())
            .zip(spec.desired().iter())
            .zip(spec.weights().iter())
        {
            freqs.extend((0..count).map(|j| band.begin() + T::from(j).unwrap() * spacing));
            // force the last point onto the band edge
            if let Some(last) = freqs.last_mut() {
                *last = band.end();
            }
            desired.extend(std::iter::repeat_n(des, count));
            weights.extend(std::iter::repeat_n(wei, count));
            band_ends.push(freqs.len());
        }
        errors.resize(grid_size, T::zero());

        Ok(Grid {
            freqs,
            desired,
            weights,
            errors,
            band_ends,
            spacing,
        })
    }

    /// Returns the nominal grid spacing.
    pub fn spacing(&self) -> T {
        self.spacing
    }

    // Scale of the weighted error used to decide whether the error curve is
    // flat: max W(f) * max(|D(f)|, 1).
    pub(crate) fn error_scale(&self) -> T {
        self.desired
            .iter()
            .zip(self.weights.iter())
            .map(|(&d, &w)| w * d.abs().max(T::one()))
            .fold(T::zero(), T::max)
    }
}

impl<T> Grid<T> {
    /// Returns the number of grid points.
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    /// Returns true if the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// Returns the grid frequencies, in strictly increasing order.
    pub fn freqs(&self) -> &[T] {
        &self.freqs
    }

    /// Returns the desired response at each grid point.
    pub fn desired(&self) -> &[T] {
        &self.desired
    }

    /// Returns the weight at each grid point.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Returns the weighted error at each grid point.
    ///
    /// The error corresponds to the interpolant of the last Remez exchange
    /// iteration, and is zero before the first iteration.
    pub fn errors(&self) -> &[T] {
        &self.errors
    }

    /// Returns the range of grid indices that belong to a band.
    ///
    /// # Panics
    ///
    /// Panics if `band` is not smaller than the number of bands.
    pub fn band_range(&self, band: usize) -> Range<usize> {
        let begin = if band == 0 {
            0
        } else {
            self.band_ends[band - 1]
        };
        begin..self.band_ends[band]
    }

    // Splits the grid into its read-only columns and the mutable error column.
    pub(crate) fn columns_mut(&mut self) -> (&[T], &[T], &[T], &mut [T]) {
        (
            &self.freqs,
            &self.desired,
            &self.weights,
            &mut self.errors,
        )
    }
}

fn band_points<T: Float>(band: &Band<T>, spacing: T) -> usize {
    (band.len() / spacing)
        .round()
        .to_usize()
        .unwrap_or(0)
        .max(1)
}

fn reserve<A>(len: usize) -> Result<Vec<A>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    Ok(v)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::BandType;

    fn spec(h_len: usize, bands: &[(f64, f64)]) -> FilterSpec<f64> {
        let n = bands.len();
        FilterSpec::new(
            h_len,
            bands
                .iter()
                .map(|&(f0, f1)| Band::new(f0, f1).unwrap())
                .collect(),
            (0..n).map(|j| j as f64).collect(),
            (0..n).map(|j| 1.0 + j as f64).collect(),
            BandType::Bandpass,
        )
        .unwrap()
    }

    #[test]
    fn lowpass_grid() {
        // r = 5, spacing = 0.5 / 80, 32 points per band
        let grid = Grid::new(&spec(9, &[(0.0, 0.2), (0.3, 0.5)]), 16).unwrap();
        assert_eq!(grid.spacing(), 0.00625);
        assert_eq!(grid.len(), 64);
        assert_eq!(grid.band_range(0), 0..32);
        assert_eq!(grid.band_range(1), 32..64);
        assert_eq!(grid.freqs()[0], 0.0);
        assert_eq!(grid.freqs()[31], 0.2);
        assert_eq!(grid.freqs()[32], 0.3);
        assert_eq!(grid.freqs()[63], 0.5);
        assert!((grid.freqs()[30] - 30.0 * 0.00625).abs() < 1e-15);
        assert!(grid.desired()[..32].iter().all(|&d| d == 0.0));
        assert!(grid.desired()[32..].iter().all(|&d| d == 1.0));
        assert!(grid.weights()[..32].iter().all(|&w| w == 1.0));
        assert!(grid.weights()[32..].iter().all(|&w| w == 2.0));
        assert!(grid.errors().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn strictly_increasing_with_band_edges() {
        let bands = [(0.0, 0.1), (0.15, 0.3), (0.35, 0.5)];
        for h_len in [4, 9, 30, 41, 64] {
            for density in [1, 8, 16, 20] {
                let grid = Grid::new(&spec(h_len, &bands), density).unwrap();
                assert!(grid.freqs().windows(2).all(|w| w[0] < w[1]));
                for (j, &(f0, f1)) in bands.iter().enumerate() {
                    let range = grid.band_range(j);
                    assert!(!range.is_empty());
                    assert_eq!(grid.freqs()[range.end - 1], f1);
                    assert!(grid.freqs()[range.clone()].iter().all(|&f| f >= f0 && f <= f1));
                    // the upper edge appears once
                    assert_eq!(grid.freqs().iter().filter(|&&f| f == f1).count(), 1);
                }
            }
        }
    }

    #[test]
    fn narrow_band_gets_one_point() {
        let grid = Grid::new(&spec(9, &[(0.0, 0.2), (0.3, 0.301)]), 16).unwrap();
        assert_eq!(grid.band_range(1), 32..33);
        assert_eq!(grid.freqs()[32], 0.301);
    }

    #[test]
    fn error_scale() {
        let grid = Grid::new(&spec(9, &[(0.0, 0.2), (0.3, 0.5)]), 16).unwrap();
        // desired 0 with weight 1, desired 1 with weight 2
        assert_eq!(grid.error_scale(), 2.0);
    }
}
