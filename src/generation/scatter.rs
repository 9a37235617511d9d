//! Synthetic forest scatter.
//!
//! Places plants on a jittered grid of candidate sites and keeps the sites
//! where fractal noise exceeds a coverage level, giving clumped stands with
//! clearings between them.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Parameters controlling forest scatter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    pub seed: u32,
    /// Distance between candidate sites in world units
    pub spacing: f32,
    /// Fraction of `spacing` a site may be displaced, in [0, 1)
    pub jitter: f32,
    /// Noise level a site must exceed to hold a plant, in [-1, 1]
    pub coverage: f32,
    /// Horizontal noise scale (larger = bigger stands)
    pub noise_scale: f32,
    /// FBM octaves
    pub octaves: u32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            spacing: 8.0,
            jitter: 0.4,
            coverage: 0.0,
            noise_scale: 60.0,
            octaves: 3,
        }
    }
}

/// Deterministic plant position generator
pub struct ForestScatter {
    params: ScatterParams,
    noise: Fbm<Perlin>,
}

impl ForestScatter {
    pub fn new(params: ScatterParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves.max(1) as usize);
        Self { params, noise }
    }

    pub fn params(&self) -> &ScatterParams {
        &self.params
    }

    /// Integer hash producing a value in [0, 1].
    fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
        let mut h = (ix as u32).wrapping_mul(374761393)
            .wrapping_add((iz as u32).wrapping_mul(668265263))
            .wrapping_add(seed.wrapping_mul(1274126177));
        h = (h ^ (h >> 13)).wrapping_mul(1103515245);
        h = h ^ (h >> 16);
        (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
    }

    /// Stand density noise at a world position, roughly in [-1, 1].
    pub fn density_at(&self, pos: Vec2) -> f32 {
        let nx = (pos.x / self.params.noise_scale) as f64;
        let nz = (pos.y / self.params.noise_scale) as f64;
        self.noise.get([nx, nz]) as f32
    }

    /// Jittered position of candidate site `(ix, iz)`.
    fn site(&self, ix: i32, iz: i32) -> Vec2 {
        let s = self.params.spacing;
        let j = self.params.jitter.clamp(0.0, 0.99);
        let ox = Self::hash_2d(ix, iz, self.params.seed) - 0.5;
        let oz = Self::hash_2d(ix, iz, self.params.seed.wrapping_add(7919)) - 0.5;
        Vec2::new(
            (ix as f32 + 0.5 + ox * j) * s,
            (iz as f32 + 0.5 + oz * j) * s,
        )
    }

    /// Plant positions inside `[min, max)`.
    pub fn scatter(&self, min: Vec2, max: Vec2) -> Vec<Vec2> {
        let s = self.params.spacing;
        if !(s > 0.0) {
            log::warn!("Scatter spacing must be positive, got {}", s);
            return Vec::new();
        }

        let (x0, x1) = ((min.x / s).floor() as i32, (max.x / s).ceil() as i32);
        let (z0, z1) = ((min.y / s).floor() as i32, (max.y / s).ceil() as i32);

        let mut plants = Vec::new();
        for iz in z0..z1 {
            for ix in x0..x1 {
                let p = self.site(ix, iz);
                if p.x < min.x || p.y < min.y || p.x >= max.x || p.y >= max.y {
                    continue;
                }
                if self.density_at(p) > self.params.coverage {
                    plants.push(p);
                }
            }
        }
        plants
    }
}
