//! Peak extraction: recovers one texel per plant from a proximity field.
//!
//! The field is quantized into plateaus, then scanned row by row. From each
//! unexamined texel above the threshold the search groups its plateau and
//! climbs to strictly larger neighboring plateaus until it reaches a local
//! maximum. A maximum not yet attributed to a plant becomes a new peak,
//! represented by the mean of its texels.

use crate::core::types::{IVec2, Vec2};
use crate::field::{CellMask, Grid, QuantizedField, ScalarField, DEFAULT_QUANTIZATION_DIGITS};
use crate::math::CaptureArea;
use crate::scanner::ScanConfig;
use super::region::RegionGrouper;

/// Result of one extraction, with the bookkeeping masks.
#[derive(Clone, Debug)]
pub struct PeakSearch {
    /// Peak texels in discovery order
    pub peaks: Vec<IVec2>,
    /// Texels consumed by any region grouping
    pub examined: CellMask,
    /// Texels belonging to a reported peak plateau
    pub peak_cells: CellMask,
    /// Number of region groupings performed
    pub regions_grouped: usize,
}

/// Extracts peak positions from proximity fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakExtractor {
    quantization_digits: u32,
    value_threshold: f32,
}

impl Default for PeakExtractor {
    fn default() -> Self {
        Self {
            quantization_digits: DEFAULT_QUANTIZATION_DIGITS,
            value_threshold: 0.0,
        }
    }
}

impl PeakExtractor {
    pub fn new(quantization_digits: u32, value_threshold: f32) -> Self {
        Self { quantization_digits, value_threshold }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.quantization_digits, config.value_threshold)
    }

    pub fn quantization_digits(&self) -> u32 {
        self.quantization_digits
    }

    pub fn value_threshold(&self) -> f32 {
        self.value_threshold
    }

    /// Peak texels of `field`, one per detected plant.
    pub fn extract(&self, field: &ScalarField) -> Vec<IVec2> {
        self.search(field).peaks
    }

    /// Run the full search and keep the examined and peak masks.
    pub fn search(&self, field: &ScalarField) -> PeakSearch {
        let quantized = QuantizedField::from_field(field, self.quantization_digits);
        let mut search = Search::new(&quantized);

        let mut peaks = Vec::new();
        for idx in 0..field.len() {
            if search.examined.cells()[idx] || !quantized.exceeds(idx, self.value_threshold) {
                continue;
            }
            let start = field.position(idx);
            if let Some(peak) = search.climb_to_peak(start) {
                log::trace!("Peak at {} from start {}", peak, start);
                peaks.push(peak);
            }
        }

        log::debug!(
            "Extracted {} peaks from {}x{} field ({} regions grouped)",
            peaks.len(), field.width(), field.height(), search.regions_grouped
        );

        PeakSearch {
            peaks,
            examined: search.examined,
            peak_cells: search.peak_cells,
            regions_grouped: search.regions_grouped,
        }
    }

    /// Peak positions mapped back to world space.
    ///
    /// `area` must be the capture area the field was built with.
    pub fn positions_in_world(&self, field: &ScalarField, area: &CaptureArea) -> Vec<Vec2> {
        self.extract(field)
            .into_iter()
            .map(|texel| area.texel_to_world(texel, field.width(), field.height()))
            .collect()
    }
}

/// Per-call search state.
struct Search<'a> {
    field: &'a QuantizedField,
    examined: CellMask,
    peak_cells: CellMask,
    grouper: RegionGrouper,
    regions_grouped: usize,
}

impl<'a> Search<'a> {
    fn new(field: &'a QuantizedField) -> Self {
        let (w, h) = (field.width(), field.height());
        Self {
            field,
            examined: Grid::new(w, h),
            peak_cells: Grid::new(w, h),
            grouper: RegionGrouper::new(w * h),
            regions_grouped: 0,
        }
    }

    /// Climb from `start` to a local maximum plateau.
    ///
    /// Returns the new peak texel, or None if the maximum reached already
    /// belongs to a reported peak. Each step moves to a strictly larger
    /// bucket, so the climb is bounded by the number of buckets.
    fn climb_to_peak(&mut self, start: IVec2) -> Option<IVec2> {
        let mut current = start;
        loop {
            let region = self.grouper.group(self.field, current);
            self.regions_grouped += 1;
            for &cell in &region.cells {
                self.examined.set(cell, true);
            }

            if let Some(next) = region.larger_neighbor {
                current = next;
                continue;
            }

            let known = region
                .cells
                .iter()
                .any(|&cell| self.peak_cells.get(cell).copied().unwrap_or(false));
            if known {
                return None;
            }

            for &cell in &region.cells {
                self.peak_cells.set(cell, true);
            }
            return Some(region.mean_position());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bucket;
    use crate::scanner::DensityFieldBuilder;

    fn field(width: usize, height: usize, values: Vec<f32>) -> ScalarField {
        Grid::from_cells(width, height, values).expect("shape mismatch")
    }

    fn stamped(size: usize, kernel: u32, texels: &[IVec2]) -> ScalarField {
        let builder = DensityFieldBuilder::new(size, size, kernel);
        let mut f: ScalarField = Grid::new(size, size);
        for &t in texels {
            builder.stamp(&mut f, t);
        }
        f
    }

    fn near(a: IVec2, b: IVec2, tolerance: i32) -> bool {
        let d = (a - b).abs();
        d.x <= tolerance && d.y <= tolerance
    }

    #[test]
    fn test_flat_field_has_no_peaks() {
        let extractor = PeakExtractor::default();
        assert!(extractor.extract(&Grid::new(32, 32)).is_empty());

        // Background just under one bucket rounds to zero
        let faint = field(3, 1, vec![0.04, 0.03, 0.01]);
        assert!(extractor.extract(&faint).is_empty());
    }

    #[test]
    fn test_threshold_filters_low_plateau() {
        let f = field(3, 1, vec![0.3, 0.3, 0.3]);
        assert_eq!(PeakExtractor::new(1, 0.0).extract(&f), vec![IVec2::new(1, 0)]);
        assert!(PeakExtractor::new(1, 0.3).extract(&f).is_empty());
        assert!(PeakExtractor::new(1, 0.5).extract(&f).is_empty());
    }

    #[test]
    fn test_plateau_at_threshold_is_rejected() {
        for tenths in 1..=9 {
            let t = tenths as f32 / 10.0;
            let f: ScalarField = Grid::filled(5, 5, t);

            let at = PeakExtractor::new(1, t).search(&f);
            assert!(at.peaks.is_empty(), "plateau at {} passed threshold {}", t, t);
            assert_eq!(at.examined.count_set(), 0);

            let below = (tenths - 1) as f32 / 10.0;
            let peaks = PeakExtractor::new(1, below).extract(&f);
            assert_eq!(peaks, vec![IVec2::new(2, 2)], "plateau at {} under threshold {}", t, below);
        }
    }

    #[test]
    fn test_uniform_field_single_peak_at_center() {
        let f: ScalarField = Grid::filled(9, 5, 0.5);
        assert_eq!(PeakExtractor::default().extract(&f), vec![IVec2::new(4, 2)]);
    }

    #[test]
    fn test_second_climb_to_known_peak_is_not_reported() {
        // Two disconnected slopes lead to the same top
        let f = field(5, 1, vec![0.2, 0.5, 0.2, 0.0, 0.0]);
        let search = PeakExtractor::default().search(&f);
        assert_eq!(search.peaks, vec![IVec2::new(1, 0)]);
        assert_eq!(search.examined.count_set(), 3);
        assert_eq!(search.peak_cells.count_set(), 1);
        // Left slope, top, right slope, and top again from the right
        assert_eq!(search.regions_grouped, 4);
    }

    #[test]
    fn test_diagonal_plateau_is_one_peak() {
        #[rustfmt::skip]
        let f = field(4, 4, vec![
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ]);
        // Mean (1.5, 1.5) rounds to even
        assert_eq!(PeakExtractor::default().extract(&f), vec![IVec2::new(2, 2)]);
    }

    #[test]
    fn test_quantization_digits() {
        let f = field(2, 1, vec![0.51, 0.54]);
        // One digit: both 0.5, one plateau with mean x = 0.5 -> 0
        assert_eq!(PeakExtractor::new(1, 0.0).extract(&f), vec![IVec2::new(0, 0)]);
        // Two digits: 0.54 is the top
        assert_eq!(PeakExtractor::new(2, 0.0).extract(&f), vec![IVec2::new(1, 0)]);
    }

    #[test]
    fn test_single_peak_recovery() {
        let f = stamped(256, 25, &[IVec2::new(128, 128)]);
        let peaks = PeakExtractor::default().extract(&f);
        assert_eq!(peaks.len(), 1);
        assert!(near(peaks[0], IVec2::new(128, 128), 1), "peak at {}", peaks[0]);
    }

    #[test]
    fn test_multi_peak_separation() {
        let centers = [IVec2::new(40, 60), IVec2::new(150, 180), IVec2::new(200, 30)];
        let f = stamped(256, 10, &centers);
        let peaks = PeakExtractor::default().extract(&f);
        assert_eq!(peaks.len(), 3);
        for c in centers {
            assert!(peaks.iter().any(|&p| near(p, c, 1)), "no peak near {c}: {peaks:?}");
        }
    }

    #[test]
    fn test_touching_kernels_stay_separate() {
        // 2K + 1 apart: cones never overlap
        let f = stamped(128, 10, &[IVec2::new(40, 64), IVec2::new(61, 64)]);
        assert_eq!(PeakExtractor::default().extract(&f).len(), 2);
    }

    #[test]
    fn test_merge_on_overlap() {
        // Known precision limit: no bucket drop between the two tops
        let f = stamped(64, 10, &[IVec2::new(30, 30), IVec2::new(31, 30)]);
        let peaks = PeakExtractor::default().extract(&f);
        assert_eq!(peaks.len(), 1);
        assert!(near(peaks[0], IVec2::new(30, 30), 1));
    }

    #[test]
    fn test_coverage_of_examined_cells() {
        let f = stamped(96, 8, &[IVec2::new(20, 20), IVec2::new(60, 70), IVec2::new(90, 5)]);
        let extractor = PeakExtractor::new(1, 0.2);
        let search = extractor.search(&f);
        let q = QuantizedField::from_field(&f, 1);

        for idx in 0..f.len() {
            let examined = search.examined.cells()[idx];
            // Threshold 0.2 is bucket 2
            if q.bucket_at(idx) > Bucket(2) {
                assert!(examined, "texel {} above threshold not examined", f.position(idx));
            } else {
                assert!(!examined, "texel {} at or below threshold examined", f.position(idx));
            }
        }
        assert_eq!(search.peaks.len(), 3);
    }

    #[test]
    fn test_peak_cells_subset_of_examined() {
        let f = stamped(64, 12, &[IVec2::new(16, 16), IVec2::new(48, 40)]);
        let search = PeakExtractor::default().search(&f);
        for idx in 0..f.len() {
            if search.peak_cells.cells()[idx] {
                assert!(search.examined.cells()[idx]);
            }
        }
        assert!(search.peak_cells.count_set() >= search.peaks.len());
    }

    #[test]
    fn test_input_field_unchanged() {
        let f = stamped(32, 6, &[IVec2::new(10, 10)]);
        let copy = f.clone();
        let _ = PeakExtractor::default().extract(&f);
        assert_eq!(f, copy);
    }

    #[test]
    fn test_end_to_end_example() {
        let config = ScanConfig::default();
        let area = CaptureArea::new(Vec2::ZERO, config.reach);
        let builder = DensityFieldBuilder::from_config(&config);
        let entity = Vec2::new(10.0, -5.0);

        let f = builder.build(&area, &[entity]);
        let extractor = PeakExtractor::from_config(&config);

        let peaks = extractor.extract(&f);
        assert_eq!(peaks.len(), 1);
        assert!(near(peaks[0], IVec2::new(154, 115), 1), "peak at {}", peaks[0]);

        let world = extractor.positions_in_world(&f, &area);
        assert_eq!(world.len(), 1);
        assert!((world[0] - entity).abs().max_element() <= 0.4, "world {}", world[0]);
    }

    #[test]
    fn test_world_round_trip_offset_center() {
        let config = ScanConfig { kernel_radius: 8, ..Default::default() };
        let center = Vec2::new(320.0, -75.0);
        let area = CaptureArea::new(center, config.reach);
        let builder = DensityFieldBuilder::from_config(&config);
        let entities = [
            center + Vec2::new(-30.0, 20.0),
            center + Vec2::new(12.5, -41.0),
            center + Vec2::new(35.0, 35.0),
            center + Vec2::new(0.3, 0.2),
        ];

        let f = builder.build(&area, &entities);
        let world = PeakExtractor::from_config(&config).positions_in_world(&f, &area);
        assert_eq!(world.len(), entities.len());

        let tolerance = config.texel_size();
        for e in entities {
            assert!(
                world.iter().any(|w| (*w - e).abs().max_element() <= tolerance),
                "no recovered position near {e}: {world:?}"
            );
        }
    }
}
