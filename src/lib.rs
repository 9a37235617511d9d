//! Vegscan - vegetation proximity fields and plant position recovery
//!
//! Plants are encoded as radial gradients in a 2D field (`scanner`), and
//! recovered from such a field, whoever produced it, by climbing to its
//! quantized peaks (`placer`).

pub mod core;
pub mod math;
pub mod field;
pub mod scanner;
pub mod placer;
pub mod generation;

pub use field::ScalarField;
pub use placer::PeakExtractor;
pub use scanner::{DensityFieldBuilder, ScanConfig, VegetationScanner};
