//! Scan configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::field::DEFAULT_QUANTIZATION_DIGITS;

/// Parameters shared by field building and peak extraction.
///
/// A field built with one config must be read back with the same
/// `resolution` and `reach`, otherwise projected positions are silently
/// wrong.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Field width and height in texels
    pub resolution: usize,
    /// Half-width of the square capture area in world units
    pub reach: f32,
    /// Radius of the falloff kernel stamped per entity, in texels
    pub kernel_radius: u32,
    /// Decimal digits kept when quantizing the field
    pub quantization_digits: u32,
    /// Quantized values at or below this never start a peak search
    pub value_threshold: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            resolution: 256,
            reach: 50.0,
            kernel_radius: 25,
            quantization_digits: DEFAULT_QUANTIZATION_DIGITS,
            value_threshold: 0.0,
        }
    }
}

impl ScanConfig {
    /// Create a new scan config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject parameters that would make the coordinate remap degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidConfig("resolution must be positive".into()));
        }
        if !(self.reach > 0.0) || !self.reach.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "reach must be positive and finite, got {}",
                self.reach
            )));
        }
        if self.kernel_radius == 0 {
            return Err(Error::InvalidConfig("kernel_radius must be positive".into()));
        }
        if self.quantization_digits > 6 {
            return Err(Error::InvalidConfig(format!(
                "quantization_digits must be at most 6, got {}",
                self.quantization_digits
            )));
        }
        if !self.value_threshold.is_finite() {
            return Err(Error::InvalidConfig("value_threshold must be finite".into()));
        }
        Ok(())
    }

    /// World size of one texel.
    pub fn texel_size(&self) -> f32 {
        2.0 * self.reach / self.resolution as f32
    }

    /// Save as pretty JSON (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file and validate (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
