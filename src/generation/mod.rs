//! Tile survey pipeline and synthetic forests.
//!
//! The survey scans a list of tiles, extracts peaks, and maps them back to
//! world space. Tiles are independent, so they are processed in parallel.

pub mod config;
pub mod scatter;

pub use config::SurveyConfig;
pub use scatter::{ForestScatter, ScatterParams};

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::core::Result;
use crate::math::CaptureArea;
use crate::placer::PeakExtractor;
use crate::scanner::{DensityFieldBuilder, SpatialIndex, VegetationKind};

/// Integer tile address on the world XZ plane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World origin (min corner) of this tile
    pub fn world_origin(&self, tile_width: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * tile_width
    }

    /// World center of this tile
    pub fn world_center(&self, tile_width: f32) -> Vec2 {
        (Vec2::new(self.x as f32, self.y as f32) + Vec2::splat(0.5)) * tile_width
    }

    /// All tiles in `[min, max]` inclusive, row by row.
    pub fn range(min: TileCoord, max: TileCoord) -> Vec<TileCoord> {
        let mut tiles = Vec::new();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                tiles.push(TileCoord::new(x, y));
            }
        }
        tiles
    }
}

/// Survey result for one tile.
#[derive(Clone, Debug, Serialize)]
pub struct TileSurvey {
    pub coord: TileCoord,
    pub center: Vec2,
    /// Entities that went into the field
    pub scanned: usize,
    /// Recovered world positions
    pub positions: Vec<Vec2>,
}

/// Scans tiles and recovers vegetation positions in parallel.
pub struct SurveyPipeline {
    config: SurveyConfig,
    builder: DensityFieldBuilder,
    extractor: PeakExtractor,
}

impl SurveyPipeline {
    /// Create a new pipeline from configuration.
    pub fn new(config: SurveyConfig) -> Result<Self> {
        config.validate()?;
        let builder = DensityFieldBuilder::from_config(&config.scan);
        let extractor = PeakExtractor::from_config(&config.scan);
        Ok(Self { config, builder, extractor })
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Survey a single tile from a list of candidate positions.
    pub fn survey_tile(&self, coord: TileCoord, positions: &[Vec2]) -> TileSurvey {
        let center = coord.world_center(self.config.tile_width);
        let area = CaptureArea::new(center, self.config.scan.reach);

        let inside: Vec<Vec2> = positions.iter().copied().filter(|&p| area.contains(p)).collect();
        let field = self.builder.build(&area, &inside);
        let recovered = self.extractor.positions_in_world(&field, &area);

        log::debug!(
            "Tile ({}, {}): {} scanned, {} recovered",
            coord.x, coord.y, inside.len(), recovered.len()
        );

        TileSurvey {
            coord,
            center,
            scanned: inside.len(),
            positions: recovered,
        }
    }

    /// Survey `tiles` for entities of `kind`.
    ///
    /// Duplicate tile requests are collapsed, keeping the first. Results are
    /// in request order.
    pub fn survey(
        &self,
        index: &dyn SpatialIndex,
        kind: VegetationKind,
        tiles: &[TileCoord],
    ) -> Vec<TileSurvey> {
        let mut seen = HashSet::new();
        let unique: Vec<TileCoord> = tiles.iter().copied().filter(|t| seen.insert(*t)).collect();
        if unique.len() < tiles.len() {
            log::debug!("Dropped {} duplicate tile requests", tiles.len() - unique.len());
        }

        let positions: Vec<Vec2> = index.query(kind.tag()).into_iter().map(|(_, p)| p).collect();

        log::info!(
            "Surveying {} tiles for {} ({} candidates)...",
            unique.len(), kind.display_name(), positions.len()
        );

        let start = std::time::Instant::now();
        let results: Vec<TileSurvey> = unique
            .par_iter()
            .map(|&coord| self.survey_tile(coord, &positions))
            .collect();

        let elapsed = start.elapsed();
        let recovered: usize = results.iter().map(|r| r.positions.len()).sum();
        log::info!(
            "Recovered {} {} in {:.1}ms ({:.0} tiles/sec)",
            recovered, kind.display_name(), elapsed.as_secs_f64() * 1000.0,
            results.len() as f64 / elapsed.as_secs_f64().max(1e-9)
        );

        results
    }
}
