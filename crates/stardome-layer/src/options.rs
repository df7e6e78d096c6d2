//! Layer configuration with documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Default brightness multiplier.
pub const DEFAULT_INTENSITY: f32 = 20.0;
/// Default probability that a grid cell holds a star.
pub const DEFAULT_DENSITY: f32 = 0.15;

/// Construction-time options for the star layer.
///
/// `intensity` can be changed at runtime through
/// [`crate::StarLayer::set_intensity`]. `density` is baked into the
/// compiled sky program and is immutable after attach; changing it means
/// detaching and building a fresh layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarOptions {
    /// Brightness multiplier, positive and finite.
    pub intensity: f32,
    /// Star probability per grid cell, in [0, 1].
    pub density: f32,
}

impl Default for StarOptions {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            density: DEFAULT_DENSITY,
        }
    }
}

impl StarOptions {
    /// Check both fields against their documented ranges.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.intensity.is_finite() && self.intensity > 0.0) {
            return Err(OptionsError::InvalidIntensity(self.intensity));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(OptionsError::InvalidDensity(self.density));
        }
        Ok(())
    }
}
