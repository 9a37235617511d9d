//! Square capture area mapping world positions onto a field

use crate::core::types::{IVec2, Vec2};
use super::remap::{remap, round_to_int};

/// Square world-space area of half-width `reach` around `center`, mapped
/// onto a `width x height` texel grid.
///
/// World `center - reach` maps to texel 0 and `center + reach` to texel
/// `width` (resp. `height`), so texel `i` covers the world span starting at
/// `center - reach + i * 2 * reach / width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureArea {
    pub center: Vec2,
    pub reach: f32,
}

impl CaptureArea {
    /// Create a capture area. `reach` must be positive.
    pub fn new(center: Vec2, reach: f32) -> Self {
        Self { center, reach }
    }

    /// Check if a world position is strictly inside the area on both axes.
    ///
    /// This is a Chebyshev (square) test with an open boundary: a position
    /// exactly `reach` away on either axis is outside.
    pub fn contains(&self, pos: Vec2) -> bool {
        let d = (pos - self.center).abs();
        d.x < self.reach && d.y < self.reach
    }

    /// Continuous field coordinates of a world position.
    pub fn world_to_field(&self, pos: Vec2, width: usize, height: usize) -> Vec2 {
        let local = pos - self.center;
        Vec2::new(
            remap(local.x, -self.reach, self.reach, 0.0, width as f32),
            remap(local.y, -self.reach, self.reach, 0.0, height as f32),
        )
    }

    /// Nearest texel of a world position. May lie outside the grid.
    pub fn world_to_texel(&self, pos: Vec2, width: usize, height: usize) -> IVec2 {
        let f = self.world_to_field(pos, width, height);
        IVec2::new(round_to_int(f.x), round_to_int(f.y))
    }

    /// World position of a texel, the inverse of `world_to_field`.
    pub fn texel_to_world(&self, texel: IVec2, width: usize, height: usize) -> Vec2 {
        Vec2::new(
            remap(
                texel.x as f32,
                0.0,
                width as f32,
                self.center.x - self.reach,
                self.center.x + self.reach,
            ),
            remap(
                texel.y as f32,
                0.0,
                height as f32,
                self.center.y - self.reach,
                self.center.y + self.reach,
            ),
        )
    }

    /// World size of one texel along x.
    pub fn texel_size(&self, width: usize) -> f32 {
        2.0 * self.reach / width as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_open_boundary() {
        let area = CaptureArea::new(Vec2::new(10.0, 10.0), 5.0);
        assert!(area.contains(Vec2::new(10.0, 10.0)));
        assert!(area.contains(Vec2::new(14.9, 5.1)));
        assert!(!area.contains(Vec2::new(15.0, 10.0)));
        assert!(!area.contains(Vec2::new(10.0, 5.0)));
        // Square, not circular: the corner region is inside
        assert!(area.contains(Vec2::new(14.0, 14.0)));
    }

    #[test]
    fn test_world_to_texel_center() {
        let area = CaptureArea::new(Vec2::ZERO, 50.0);
        assert_eq!(area.world_to_texel(Vec2::ZERO, 256, 256), IVec2::new(128, 128));
        assert_eq!(area.world_to_texel(Vec2::new(-50.0, -50.0), 256, 256), IVec2::ZERO);
    }

    #[test]
    fn test_world_to_texel_offset() {
        let area = CaptureArea::new(Vec2::ZERO, 50.0);
        // 60 * 2.56 = 153.6, 45 * 2.56 = 115.2
        assert_eq!(area.world_to_texel(Vec2::new(10.0, -5.0), 256, 256), IVec2::new(154, 115));
    }

    #[test]
    fn test_texel_to_world_uses_center() {
        let area = CaptureArea::new(Vec2::new(100.0, -20.0), 50.0);
        let world = area.texel_to_world(IVec2::new(128, 128), 256, 256);
        assert!((world - Vec2::new(100.0, -20.0)).length() < 1e-4);
    }

    #[test]
    fn test_round_trip_within_texel() {
        let area = CaptureArea::new(Vec2::new(3.0, 7.0), 50.0);
        let pos = Vec2::new(-12.3, 31.7);
        let texel = area.world_to_texel(pos, 256, 256);
        let back = area.texel_to_world(texel, 256, 256);
        let half_texel = area.texel_size(256) * 0.5;
        assert!((back.x - pos.x).abs() <= half_texel + 1e-4);
        assert!((back.y - pos.y).abs() <= half_texel + 1e-4);
    }
}
