use crate::bands::check_bands;
use crate::error::{Result, ValidationError};
use num_traits::Float;
use std::fmt;

/// Band.
///
/// A band defines a closed subinterval of [0.0, 0.5] in which the
/// Parks-McClellan algorithm attempts to make the weighted error function as
/// small as possible. Frequencies are given in cycles/sample.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Band<T> {
    begin: T,
    end: T,
}

impl<T: Float> Band<T> {
    /// Creates a new band.
    ///
    /// The band is the closed interval `[begin, end]`. The band must have
    /// positive length, so `begin` must be strictly smaller than `end`.
    pub fn new(begin: T, end: T) -> Result<Band<T>> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(ValidationError::BandLimitsOutOfBounds.into());
        }
        if begin >= end {
            return Err(ValidationError::BandLimitsWrongOrder.into());
        }
        if begin < T::zero() || end > T::from(0.5).unwrap() {
            return Err(ValidationError::BandLimitsOutOfBounds.into());
        }
        Ok(Band { begin, end })
    }
}

impl<T: Copy> Band<T> {
    /// Returns the beginning of the band.
    pub fn begin(&self) -> T {
        self.begin
    }

    /// Returns the end of the band.
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: Float> Band<T> {
    /// Returns the length of the band.
    ///
    /// The length is defined as `end - begin`.
    pub fn len(&self) -> T {
        self.end - self.begin
    }
}

/// Band type.
///
/// The band type selects the symmetry handling of the response. Only
/// [`BandType::Bandpass`] is handled by the exchange engine. The other values
/// are accepted and carried along in the [`FilterSpec`] for downstream
/// transforms, but the design itself treats them as the bandpass case.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BandType {
    /// Generic multi-band design (lowpass, highpass, bandpass, ...).
    #[default]
    Bandpass,
    /// Differentiator.
    Differentiator,
    /// Hilbert transformer.
    Hilbert,
}

/// Validated filter description.
///
/// A `FilterSpec` holds the filter length, an ordered list of disjoint bands
/// and one desired response value and one weight for each band. It can only
/// be obtained through [`FilterSpec::new`], which validates all the inputs,
/// and it is never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec<T> {
    h_len: usize,
    bands: Vec<Band<T>>,
    desired: Vec<T>,
    weights: Vec<T>,
    band_type: BandType,
}

impl<T: Float> FilterSpec<T> {
    /// Creates a new filter specification.
    ///
    /// The `h_len` argument is the filter length. The `bands` must be sorted
    /// in increasing frequency and must not overlap or touch. The `desired`
    /// and `weights` slices must contain one value per band, and all the
    /// weights must be positive.
    pub fn new(
        h_len: usize,
        bands: Vec<Band<T>>,
        desired: Vec<T>,
        weights: Vec<T>,
        band_type: BandType,
    ) -> Result<FilterSpec<T>> {
        if h_len == 0 {
            return Err(ValidationError::FilterTooShort.into());
        }
        check_bands(&bands)?;
        for values in [&desired, &weights] {
            if values.len() != bands.len() {
                return Err(ValidationError::ValueCountMismatch {
                    expected: bands.len(),
                    got: values.len(),
                }
                .into());
            }
        }
        if desired.iter().any(|d| !d.is_finite()) {
            return Err(ValidationError::NonFiniteDesired.into());
        }
        if weights.iter().any(|&w| !w.is_finite() || w <= T::zero()) {
            return Err(ValidationError::NonPositiveWeight.into());
        }
        Ok(FilterSpec {
            h_len,
            bands,
            desired,
            weights,
            band_type,
        })
    }
}

impl<T> FilterSpec<T> {
    /// Returns the filter length.
    pub fn h_len(&self) -> usize {
        self.h_len
    }

    /// Returns the parity of the filter length (1 for odd, 0 for even).
    pub fn parity(&self) -> usize {
        self.h_len % 2
    }

    /// Returns the filter semi-length.
    pub fn semi_length(&self) -> usize {
        (self.h_len - self.parity()) / 2
    }

    /// Returns the number of approximating functions, `r`.
    ///
    /// The extremal set of the Remez exchange has `r + 1` elements.
    pub fn num_functions(&self) -> usize {
        self.semi_length() + self.parity()
    }

    /// Returns the list of bands, in increasing frequency.
    pub fn bands(&self) -> &[Band<T>] {
        &self.bands
    }

    /// Returns the desired response of each band.
    pub fn desired(&self) -> &[T] {
        &self.desired
    }

    /// Returns the weight of each band.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Returns the band type.
    pub fn band_type(&self) -> BandType {
        self.band_type
    }
}

impl<T: Float> fmt::Display for FilterSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "filter length {} ({:?}), {} bands:",
            self.h_len,
            self.band_type,
            self.bands.len()
        )?;
        let show = |x: T| x.to_f64().unwrap_or(f64::NAN);
        for ((band, &des), &wei) in self
            .bands
            .iter()
            .zip(self.desired.iter())
            .zip(self.weights.iter())
        {
            writeln!(
                f,
                "  [{:12.8} {:12.8}] desired {:12.8} weight {:12.8}",
                show(band.begin()),
                show(band.end()),
                show(des),
                show(wei)
            )?;
        }
        Ok(())
    }
}

/// Parks-McClellan design parameters struct.
///
/// This struct bundles a validated [`FilterSpec`] with the tunables of the
/// Remez exchange. It is constructed with [`RemezParameters::new`] or with the
/// [`remez_parameters`](super::remez_parameters) function, and the defaults
/// can be changed through the [`ParametersBuilder`] trait.
#[derive(Debug, Clone)]
pub struct RemezParameters<T> {
    spec: FilterSpec<T>,
    grid_density: usize,
    max_iterations: usize,
    flat_error_threshold: T,
}

/// Parks-McClellan design parameters trait.
///
/// This trait defines the methods that the [`FilterDesigner`](super::FilterDesigner)
/// uses to obtain the filter description and the configuration of the Remez
/// exchange. It is implemented by [`RemezParameters`]. The designer reads
/// these values once, at construction.
pub trait DesignParameters<T> {
    /// Returns the validated filter description.
    fn filter_spec(&self) -> &FilterSpec<T>;

    /// Returns the grid density.
    ///
    /// The spacing of the dense frequency grid is `0.5 / (grid_density * r)`,
    /// where `r` is the number of approximating functions.
    fn grid_density(&self) -> usize;

    /// Returns the maximum number of Remez exchange iterations.
    fn max_iterations(&self) -> usize;

    /// Returns the relative level below which the weighted error curve is
    /// considered identically zero.
    ///
    /// The level is relative to the largest value of `W(f) * max(|D(f)|, 1)`
    /// over the grid. It is only used when the error curve has fewer extrema
    /// than the extremal set needs. If the minimax error and the whole curve
    /// are below this level, the current interpolant is already exact and the
    /// exchange keeps the extremal set unchanged.
    fn flat_error_threshold(&self) -> T;
}

/// Parks-McClellan design parameters setter trait.
///
/// This trait is implemented by [`RemezParameters`] and allows the default
/// values to be modified by chaining the methods defined by the trait.
pub trait ParametersBuilder<T>: DesignParameters<T> {
    /// Sets the grid density.
    ///
    /// See [`DesignParameters::grid_density`].
    fn set_grid_density(&mut self, grid_density: usize) -> &mut Self;

    /// Sets the maximum number of Remez exchange iterations.
    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self;

    /// Sets the flat error threshold.
    ///
    /// See [`DesignParameters::flat_error_threshold`].
    fn set_flat_error_threshold(&mut self, threshold: T) -> &mut Self;
}

impl<T: Float> RemezParameters<T> {
    /// Creates new design parameters for a bandpass-type design.
    ///
    /// The arguments are validated as described in [`FilterSpec::new`]. The
    /// grid density defaults to 16, the iteration cap to 40 and the flat error
    /// threshold to the square root of the machine epsilon of `T`.
    pub fn new(
        h_len: usize,
        bands: Vec<Band<T>>,
        desired: Vec<T>,
        weights: Vec<T>,
    ) -> Result<Self> {
        let spec = FilterSpec::new(h_len, bands, desired, weights, BandType::Bandpass)?;
        Ok(RemezParameters::from_spec(spec))
    }

    /// Creates new design parameters from an already validated
    /// [`FilterSpec`], using the default tunables.
    pub fn from_spec(spec: FilterSpec<T>) -> Self {
        RemezParameters {
            spec,
            grid_density: 16,
            max_iterations: 40,
            flat_error_threshold: T::epsilon().sqrt(),
        }
    }
}

impl<T: Copy> DesignParameters<T> for RemezParameters<T> {
    fn filter_spec(&self) -> &FilterSpec<T> {
        &self.spec
    }
    fn grid_density(&self) -> usize {
        self.grid_density
    }
    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    fn flat_error_threshold(&self) -> T {
        self.flat_error_threshold
    }
}

impl<T: Copy> ParametersBuilder<T> for RemezParameters<T> {
    fn set_grid_density(&mut self, grid_density: usize) -> &mut Self {
        self.grid_density = grid_density;
        self
    }

    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    fn set_flat_error_threshold(&mut self, threshold: T) -> &mut Self {
        self.flat_error_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn two_bands() -> Vec<Band<f64>> {
        vec![Band::new(0.0, 0.2).unwrap(), Band::new(0.3, 0.5).unwrap()]
    }

    #[test]
    fn band_limits() {
        assert!(Band::new(0.0, 0.5).is_ok());
        assert!(matches!(
            Band::new(0.2, 0.2),
            Err(Error::Validation(ValidationError::BandLimitsWrongOrder))
        ));
        assert!(matches!(
            Band::new(0.3, 0.1),
            Err(Error::Validation(ValidationError::BandLimitsWrongOrder))
        ));
        assert!(matches!(
            Band::new(-0.1, 0.1),
            Err(Error::Validation(ValidationError::BandLimitsOutOfBounds))
        ));
        assert!(matches!(
            Band::new(0.1, 0.6),
            Err(Error::Validation(ValidationError::BandLimitsOutOfBounds))
        ));
        assert!(matches!(
            Band::new(f64::NAN, 0.1),
            Err(Error::Validation(ValidationError::BandLimitsOutOfBounds))
        ));
    }

    #[test]
    fn derived_lengths() {
        let odd = FilterSpec::new(9, two_bands(), vec![1.0, 0.0], vec![1.0, 1.0], BandType::Bandpass)
            .unwrap();
        assert_eq!(odd.parity(), 1);
        assert_eq!(odd.semi_length(), 4);
        assert_eq!(odd.num_functions(), 5);
        let even =
            FilterSpec::new(30, two_bands(), vec![1.0, 0.0], vec![1.0, 1.0], BandType::Hilbert)
                .unwrap();
        assert_eq!(even.parity(), 0);
        assert_eq!(even.semi_length(), 15);
        assert_eq!(even.num_functions(), 15);
        assert_eq!(even.band_type(), BandType::Hilbert);
    }

    #[test]
    fn rejects_malformed_values() {
        let spec = |h_len, des: Vec<f64>, wei: Vec<f64>| {
            FilterSpec::new(h_len, two_bands(), des, wei, BandType::Bandpass)
        };
        assert!(matches!(
            spec(0, vec![1.0, 0.0], vec![1.0, 1.0]),
            Err(Error::Validation(ValidationError::FilterTooShort))
        ));
        assert!(matches!(
            spec(9, vec![1.0], vec![1.0, 1.0]),
            Err(Error::Validation(ValidationError::ValueCountMismatch {
                expected: 2,
                got: 1
            }))
        ));
        assert!(matches!(
            spec(9, vec![1.0, 0.0], vec![1.0, 1.0, 1.0]),
            Err(Error::Validation(ValidationError::ValueCountMismatch {
                expected: 2,
                got: 3
            }))
        ));
        assert!(matches!(
            spec(9, vec![1.0, 0.0], vec![1.0, 0.0]),
            Err(Error::Validation(ValidationError::NonPositiveWeight))
        ));
        assert!(matches!(
            spec(9, vec![1.0, 0.0], vec![-2.0, 1.0]),
            Err(Error::Validation(ValidationError::NonPositiveWeight))
        ));
        assert!(matches!(
            spec(9, vec![f64::INFINITY, 0.0], vec![1.0, 1.0]),
            Err(Error::Validation(ValidationError::NonFiniteDesired))
        ));
    }

    #[test]
    fn parameter_defaults_and_setters() {
        let mut params =
            RemezParameters::new(35, two_bands(), vec![1.0, 0.0], vec![1.0, 10.0]).unwrap();
        assert_eq!(params.grid_density(), 16);
        assert_eq!(params.max_iterations(), 40);
        assert_eq!(params.flat_error_threshold(), f64::EPSILON.sqrt());
        params
            .set_grid_density(32)
            .set_max_iterations(10)
            .set_flat_error_threshold(1e-12);
        assert_eq!(params.grid_density(), 32);
        assert_eq!(params.max_iterations(), 10);
        assert_eq!(params.flat_error_threshold(), 1e-12);
        assert_eq!(params.filter_spec().weights(), &[1.0, 10.0]);
    }

    #[test]
    fn display_lists_bands() {
        let spec =
            FilterSpec::new(9, two_bands(), vec![1.0, 0.0], vec![1.0, 1.0], BandType::Bandpass)
                .unwrap();
        let text = spec.to_string();
        assert!(text.starts_with("filter length 9 (Bandpass), 2 bands:"));
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("0.30000000"));
    }
}
