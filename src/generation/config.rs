//! Survey configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::scanner::ScanConfig;

/// Configuration for surveying a grid of tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Field and extraction parameters used for every tile
    pub scan: ScanConfig,
    /// World size of one tile. Tiles are centered on
    /// `(coord + 0.5) * tile_width`.
    pub tile_width: f32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        let scan = ScanConfig::default();
        // Adjacent capture areas abut exactly
        let tile_width = scan.reach * 2.0;
        Self { scan, tile_width }
    }
}

impl SurveyConfig {
    /// Create from scan parameters, with tiles matching the capture area.
    pub fn from_scan(scan: ScanConfig) -> Self {
        let tile_width = scan.reach * 2.0;
        Self { scan, tile_width }
    }

    pub fn validate(&self) -> Result<()> {
        self.scan.validate()?;
        if !(self.tile_width > 0.0) || !self.tile_width.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "tile_width must be positive and finite, got {}",
                self.tile_width
            )));
        }
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
