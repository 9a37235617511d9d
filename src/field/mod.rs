//! Proximity fields: grids, quantization, and interchange formats.

pub mod grid;
pub mod quantize;
pub mod text;
pub mod image;

pub use grid::{CellMask, Grid, ScalarField, NEIGHBOR_OFFSETS_8};
pub use quantize::{quantize, Bucket, QuantizedField, DEFAULT_QUANTIZATION_DIGITS};
pub use text::{load_text, read_rows, save_text, write_rows};
pub use self::image::{field_from_image, field_to_image, load_png, save_png};
