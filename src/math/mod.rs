//! Mathematical utilities: range remapping and capture-area projection

pub mod remap;
pub mod capture;

pub use remap::{remap, round_to_int};
pub use capture::CaptureArea;
