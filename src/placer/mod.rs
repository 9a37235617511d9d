//! Vegetation placer: turns proximity fields back into plant positions.

pub mod region;
pub mod extractor;

pub use region::{Region, RegionGrouper};
pub use extractor::{PeakExtractor, PeakSearch};
