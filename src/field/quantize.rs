//! Decimal quantization of proximity fields.
//!
//! Gradient values computed from Euclidean distances almost never collide
//! exactly, so flood fill over raw floats would produce one-texel islands.
//! Rounding every value to a few decimal digits creates plateaus of equal
//! value. Values are stored as integer bucket indices so plateau membership
//! is an exact integer comparison.

use crate::core::types::IVec2;
use super::grid::{Grid, ScalarField};

/// Decimal digits kept by default (buckets 0.0, 0.1, ..., 1.0)
pub const DEFAULT_QUANTIZATION_DIGITS: u32 = 1;

/// Float noise below this fraction of a bucket is discarded before rounding,
/// so a stored `0.35_f32` (0.3499999940...) rounds like the decimal 0.35.
const SNAP_SCALE: f64 = 1e6;

/// A quantized value: `round(value * 10^digits)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket(pub i32);

impl Bucket {
    /// Decimal value this bucket stands for.
    pub fn value(self, digits: u32) -> f64 {
        self.0 as f64 / digit_scale(digits)
    }
}

#[inline]
fn digit_scale(digits: u32) -> f64 {
    10f64.powi(digits as i32)
}

/// Round `value` to `digits` decimal digits, halves to even.
pub fn quantize(value: f32, digits: u32) -> Bucket {
    let scaled = value as f64 * digit_scale(digits);
    let snapped = (scaled * SNAP_SCALE).round() / SNAP_SCALE;
    Bucket(snapped.round_ties_even() as i32)
}

/// Field of quantized values, same shape as the source field.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantizedField {
    buckets: Grid<Bucket>,
    digits: u32,
}

impl QuantizedField {
    /// Quantize every texel of `field`.
    pub fn from_field(field: &ScalarField, digits: u32) -> Self {
        Self {
            buckets: field.map(|&v| quantize(v, digits)),
            digits,
        }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    pub fn width(&self) -> usize {
        self.buckets.width()
    }

    pub fn height(&self) -> usize {
        self.buckets.height()
    }

    pub fn grid(&self) -> &Grid<Bucket> {
        &self.buckets
    }

    /// Bucket at an in-bounds texel
    #[inline]
    pub fn bucket(&self, pos: IVec2) -> Bucket {
        self.buckets.cells()[self.buckets.index(pos)]
    }

    /// Bucket at a linear index
    #[inline]
    pub fn bucket_at(&self, index: usize) -> Bucket {
        self.buckets.cells()[index]
    }

    /// Decimal value at an in-bounds texel
    pub fn value(&self, pos: IVec2) -> f64 {
        self.bucket(pos).value(self.digits)
    }

    /// Check if the quantized value at `index` strictly exceeds `threshold`.
    ///
    /// Compared in `f32`, the precision thresholds are given in, so a
    /// plateau at exactly `threshold` never passes.
    #[inline]
    pub fn exceeds(&self, index: usize, threshold: f32) -> bool {
        (self.bucket_at(index).value(self.digits) as f32) > threshold
    }
}
