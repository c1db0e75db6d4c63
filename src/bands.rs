use crate::{
    error::{Result, ValidationError},
    types::Band,
};
use num_traits::Float;

// Check that the bands are correctly defined. The bands must be given in
// increasing frequency, and they must not overlap or touch.
pub fn check_bands<T: Float>(bands: &[Band<T>]) -> Result<()> {
    if bands.is_empty() {
        return Err(ValidationError::BandsEmpty.into());
    }
    for (band1, band2) in bands.iter().zip(bands.iter().skip(1)) {
        if band1.end() >= band2.begin() {
            return Err(ValidationError::BandsOverlap.into());
        }
    }
    Ok(())
}
