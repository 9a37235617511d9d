//! Density field builder: stamps a radial falloff kernel per entity.

use crate::core::types::{IVec2, Vec2};
use crate::field::{Grid, ScalarField};
use crate::math::{remap, CaptureArea};
use super::config::ScanConfig;

/// Builds proximity fields from entity world positions.
///
/// Every admitted entity contributes a cone: 1.0 at its texel, falling off
/// linearly to 0.0 at `kernel_radius` texels. Overlapping cones keep the
/// larger value per texel, so the nearest entity always wins and nothing is
/// counted twice.
#[derive(Clone, Debug)]
pub struct DensityFieldBuilder {
    width: usize,
    height: usize,
    kernel_radius: u32,
}

impl DensityFieldBuilder {
    /// Create a builder for `width x height` fields.
    pub fn new(width: usize, height: usize, kernel_radius: u32) -> Self {
        debug_assert!(kernel_radius > 0, "kernel radius must be positive");
        Self { width, height, kernel_radius }
    }

    /// Create a square builder from a scan config.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.resolution, config.resolution, config.kernel_radius)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kernel_radius(&self) -> u32 {
        self.kernel_radius
    }

    /// Build a fresh field from the entities inside `area`.
    ///
    /// Entities outside the capture area (see `CaptureArea::contains`) are
    /// ignored.
    pub fn build(&self, area: &CaptureArea, positions: &[Vec2]) -> ScalarField {
        let mut field: ScalarField = Grid::new(self.width, self.height);
        let mut admitted = 0usize;

        for &pos in positions {
            if !area.contains(pos) {
                continue;
            }
            let texel = area.world_to_texel(pos, self.width, self.height);
            self.stamp(&mut field, texel);
            admitted += 1;
        }

        log::debug!(
            "Built {}x{} field: {} of {} entities inside reach {}",
            self.width, self.height, admitted, positions.len(), area.reach
        );
        field
    }

    /// Stamp one kernel centered on `texel`, max-combining with `field`.
    ///
    /// Texels outside the field are skipped; the center itself may lie
    /// outside, in which case only the overlapping part of the cone lands.
    pub fn stamp(&self, field: &mut ScalarField, texel: IVec2) {
        let k = self.kernel_radius as i32;
        let kf = self.kernel_radius as f32;

        for y in (texel.y - k)..=(texel.y + k) {
            for x in (texel.x - k)..=(texel.x + k) {
                let pos = IVec2::new(x, y);
                if !field.in_bounds(pos) {
                    continue;
                }
                let distance = (pos - texel).as_vec2().length();
                if distance < kf {
                    let intensity = 1.0 - remap(distance, 0.0, kf, 0.0, 1.0);
                    field.raise(pos, intensity);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(field: &ScalarField, x: i32, y: i32) -> f32 {
        *field.get(IVec2::new(x, y)).expect("texel in bounds")
    }

    #[test]
    fn test_empty_positions_zero_field() {
        let builder = DensityFieldBuilder::new(32, 32, 5);
        let field = builder.build(&CaptureArea::new(Vec2::ZERO, 10.0), &[]);
        assert_eq!(field.width(), 32);
        assert!(field.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_kernel_profile() {
        let builder = DensityFieldBuilder::new(64, 64, 10);
        let mut field: ScalarField = Grid::new(64, 64);
        builder.stamp(&mut field, IVec2::new(32, 32));

        assert_eq!(value(&field, 32, 32), 1.0);
        assert!((value(&field, 37, 32) - 0.5).abs() < 1e-6);
        assert!((value(&field, 32, 23) - 0.1).abs() < 1e-6);
        // Exactly K away: d < K fails, stays zero
        assert_eq!(value(&field, 42, 32), 0.0);
        // Corner of the stamp square lies outside the circle
        assert_eq!(value(&field, 40, 40), 0.0);
        let (x, y) = (32 + 6, 32 + 6);
        let expected = 1.0 - (72.0f32).sqrt() / 10.0;
        assert!((value(&field, x, y) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_stamp_clips_at_edges() {
        let builder = DensityFieldBuilder::new(16, 16, 6);
        let mut field: ScalarField = Grid::new(16, 16);
        builder.stamp(&mut field, IVec2::new(0, 15));
        assert_eq!(value(&field, 0, 15), 1.0);
        assert!(value(&field, 3, 12) > 0.0);

        // Center entirely outside: only the overlapping part lands
        let mut field: ScalarField = Grid::new(16, 16);
        builder.stamp(&mut field, IVec2::new(-2, 8));
        assert!((value(&field, 0, 8) - (1.0 - 2.0 / 6.0)).abs() < 1e-6);
        assert_eq!(value(&field, 4, 8), 0.0);
    }

    #[test]
    fn test_overlap_keeps_maximum() {
        let builder = DensityFieldBuilder::new(64, 64, 10);
        let mut field: ScalarField = Grid::new(64, 64);
        builder.stamp(&mut field, IVec2::new(20, 20));
        builder.stamp(&mut field, IVec2::new(26, 20));

        // Between the two: nearest entity wins, no summing
        assert!((value(&field, 22, 20) - 0.8).abs() < 1e-6);
        assert!((value(&field, 24, 20) - 0.8).abs() < 1e-6);
        assert_eq!(value(&field, 26, 20), 1.0);
        assert!(field.max_value() <= 1.0);
    }

    #[test]
    fn test_build_filters_by_reach() {
        let builder = DensityFieldBuilder::new(100, 100, 3);
        let area = CaptureArea::new(Vec2::new(50.0, 50.0), 10.0);
        let positions = [
            Vec2::new(50.0, 50.0), // center
            Vec2::new(60.0, 50.0), // exactly reach away: excluded
            Vec2::new(75.0, 75.0), // far outside
        ];
        let field = builder.build(&area, &positions);
        assert_eq!(value(&field, 50, 50), 1.0);
        // Excluded entity would have landed on texel 100 (out of bounds), and
        // no texel on the right edge got its cone
        assert_eq!(value(&field, 99, 50), 0.0);
        assert_eq!(field.cells().iter().filter(|&&v| v == 1.0).count(), 1);
    }

    #[test]
    fn test_build_is_fresh_each_call() {
        let builder = DensityFieldBuilder::new(32, 32, 4);
        let area = CaptureArea::new(Vec2::ZERO, 16.0);
        let first = builder.build(&area, &[Vec2::new(-8.0, -8.0)]);
        let second = builder.build(&area, &[Vec2::new(8.0, 8.0)]);
        assert_eq!(value(&first, 8, 8), 1.0);
        assert_eq!(value(&second, 8, 8), 0.0);
        assert_eq!(value(&second, 24, 24), 1.0);
    }
}
