//! Vegetation scanner: builds proximity fields from tagged host entities.
//!
//! The scanner asks a `SpatialIndex` for every entity of a vegetation kind,
//! keeps those inside the square capture area around a query center, and
//! stamps them into a field with `DensityFieldBuilder`.

pub mod config;
pub mod index;
pub mod builder;

pub use config::ScanConfig;
pub use index::{EntityId, SpatialIndex, TaggedIndex, VegetationKind};
pub use builder::DensityFieldBuilder;

use crate::core::types::Vec2;
use crate::core::Result;
use crate::field::ScalarField;
use crate::math::CaptureArea;
use crate::placer::PeakExtractor;

/// Scans a host's entities into proximity fields.
pub struct VegetationScanner<'a> {
    index: &'a dyn SpatialIndex,
    config: ScanConfig,
    builder: DensityFieldBuilder,
}

impl<'a> VegetationScanner<'a> {
    /// Create a scanner. Fails if the config is invalid.
    pub fn new(index: &'a dyn SpatialIndex, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let builder = DensityFieldBuilder::from_config(&config);
        Ok(Self { index, config, builder })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Capture area around `center` for this scanner's reach.
    pub fn capture_area(&self, center: Vec2) -> CaptureArea {
        CaptureArea::new(center, self.config.reach)
    }

    /// Entities of `kind` inside the capture area around `center`.
    ///
    /// Hosts use this to remove the scanned objects after taking a field.
    pub fn entities_in_reach(&self, kind: VegetationKind, center: Vec2) -> Vec<(EntityId, Vec2)> {
        let area = self.capture_area(center);
        self.index
            .query(kind.tag())
            .into_iter()
            .filter(|(_, pos)| area.contains(*pos))
            .collect()
    }

    /// Build the proximity field of `kind` around `center`.
    pub fn scan(&self, kind: VegetationKind, center: Vec2) -> ScalarField {
        let positions: Vec<Vec2> = self
            .entities_in_reach(kind, center)
            .into_iter()
            .map(|(_, pos)| pos)
            .collect();
        log::info!("Number of scanned {}: {}", kind.display_name(), positions.len());
        self.builder.build(&self.capture_area(center), &positions)
    }

    pub fn scan_for_trees(&self, center: Vec2) -> ScalarField {
        self.scan(VegetationKind::Tree, center)
    }

    pub fn scan_for_bushes(&self, center: Vec2) -> ScalarField {
        self.scan(VegetationKind::Bush, center)
    }

    /// Scan, extract peaks, and project them back to world positions.
    pub fn detect(&self, kind: VegetationKind, center: Vec2) -> Vec<Vec2> {
        let field = self.scan(kind, center);
        PeakExtractor::from_config(&self.config).positions_in_world(&field, &self.capture_area(center))
    }
}
