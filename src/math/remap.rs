//! Linear range remapping and rounding helpers

/// Map `value` from `[min_in, max_in]` to the same relative position in
/// `[min_out, max_out]`.
///
/// `remap(6.0, 0.0, 10.0, 0.0, 50.0) == 30.0`. Values outside the input
/// range extrapolate linearly. The input range must not be empty.
#[inline]
pub fn remap(value: f32, min_in: f32, max_in: f32, min_out: f32, max_out: f32) -> f32 {
    debug_assert!(max_in != min_in, "remap with empty input range [{min_in}, {max_in}]");
    (value - min_in) * (max_out - min_out) / (max_in - min_in) + min_out
}

/// Round to the nearest integer, halves to even.
///
/// Texel projection and peak averaging both round this way, so a point
/// exactly between two texels always lands on the same one.
#[inline]
pub fn round_to_int(value: f32) -> i32 {
    value.round_ties_even() as i32
}
