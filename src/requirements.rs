use crate::{
    error::{Result, ValidationError},
    types::{Band, RemezParameters},
};
use num_traits::Float;

/// Creates parameters for the Parks-McClellan algorithm in terms of a list of
/// [`BandSetting`]s.
///
/// This is one of the two ways of describing a design. Each `BandSetting`
/// carries a band together with its desired response and weight, and this
/// function splits them into the parallel lists held by a
/// [`FilterSpec`](crate::FilterSpec). The `h_len` parameter indicates the
/// length of the FIR filter to be designed.
///
/// The returned [`RemezParameters`] use the same defaults as
/// [`RemezParameters::new`], which can be changed with the methods of the
/// [`ParametersBuilder`](crate::ParametersBuilder) trait.
pub fn remez_parameters<T: Float>(
    h_len: usize,
    band_settings: &[BandSetting<T>],
) -> Result<RemezParameters<T>> {
    if band_settings.is_empty() {
        return Err(ValidationError::BandsEmpty.into());
    }
    let bands = band_settings.iter().map(|s| s.band()).collect();
    let desired = band_settings.iter().map(|s| s.desired()).collect();
    let weights = band_settings.iter().map(|s| s.weight()).collect();
    RemezParameters::new(h_len, bands, desired, weights)
}

/// Band with desired response and weight.
///
/// This struct attaches a constant desired response and a constant weight to
/// a [`Band`]. A list of `BandSetting`s is turned into design parameters by
/// calling [`remez_parameters`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BandSetting<T> {
    band: Band<T>,
    desired: T,
    weight: T,
}

impl<T: Float> BandSetting<T> {
    /// Creates a new `BandSetting` with default weight.
    ///
    /// The `band_begin` and `band_end` parameters indicate the begin and the
    /// end of the band respectively. The weight is set to one. A custom weight
    /// can be given with [`BandSetting::with_weight`] or
    /// [`BandSetting::set_weight`].
    pub fn new(band_begin: T, band_end: T, desired: T) -> Result<BandSetting<T>> {
        BandSetting::with_weight(band_begin, band_end, desired, T::one())
    }

    /// Creates a new `BandSetting` with a custom weight.
    ///
    /// The weight must be positive. The remaining parameters behave as in
    /// [`BandSetting::new`].
    pub fn with_weight(
        band_begin: T,
        band_end: T,
        desired: T,
        weight: T,
    ) -> Result<BandSetting<T>> {
        let band = Band::new(band_begin, band_end)?;
        if !weight.is_finite() || weight <= T::zero() {
            return Err(ValidationError::NonPositiveWeight.into());
        }
        Ok(BandSetting {
            band,
            desired,
            weight,
        })
    }
}

impl<T: Copy> BandSetting<T> {
    /// Returns the [`Band`] associated to this [`BandSetting`].
    pub fn band(&self) -> Band<T> {
        self.band
    }

    /// Returns the desired response in this band.
    pub fn desired(&self) -> T {
        self.desired
    }

    /// Returns the weight of this band.
    pub fn weight(&self) -> T {
        self.weight
    }

    /// Sets the [`Band`] associated to this [`BandSetting`].
    pub fn set_band(&mut self, band: Band<T>) {
        self.band = band;
    }

    /// Sets the desired response used by this [`BandSetting`].
    pub fn set_desired(&mut self, desired: T) {
        self.desired = desired;
    }

    /// Sets the weight used by this [`BandSetting`].
    ///
    /// The weight is validated when the settings are turned into parameters
    /// by [`remez_parameters`].
    pub fn set_weight(&mut self, weight: T) {
        self.weight = weight;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::types::DesignParameters;

    #[test]
    fn split_settings() {
        let settings = [
            BandSetting::new(0.0, 0.2, 1.0).unwrap(),
            BandSetting::with_weight(0.3, 0.5, 0.0, 10.0).unwrap(),
        ];
        let params = remez_parameters(35, &settings).unwrap();
        let spec = params.filter_spec();
        assert_eq!(spec.h_len(), 35);
        assert_eq!(spec.bands()[1].begin(), 0.3);
        assert_eq!(spec.desired(), &[1.0, 0.0]);
        assert_eq!(spec.weights(), &[1.0, 10.0]);
    }

    #[test]
    fn empty_settings() {
        assert!(matches!(
            remez_parameters::<f64>(9, &[]),
            Err(Error::Validation(ValidationError::BandsEmpty))
        ));
    }

    #[test]
    fn bad_weight() {
        assert!(matches!(
            BandSetting::with_weight(0.0, 0.2, 1.0, 0.0),
            Err(Error::Validation(ValidationError::NonPositiveWeight))
        ));
        let mut setting = BandSetting::new(0.0, 0.2, 1.0).unwrap();
        setting.set_weight(-1.0);
        assert!(matches!(
            remez_parameters(9, &[setting]),
            Err(Error::Validation(ValidationError::NonPositiveWeight))
        ));
    }

    #[test]
    fn overlapping_settings() {
        let settings = [
            BandSetting::new(0.0, 0.3, 1.0).unwrap(),
            BandSetting::new(0.25, 0.5, 0.0).unwrap(),
        ];
        assert!(matches!(
            remez_parameters(9, &settings),
            Err(Error::Validation(ValidationError::BandsOverlap))
        ));
    }
}
