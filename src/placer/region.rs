//! Iso-value region grouping over a quantized field.

use std::collections::VecDeque;

use crate::core::types::IVec2;
use crate::field::{Bucket, QuantizedField};
use crate::math::round_to_int;

/// Maximal 8-connected set of texels sharing one quantized value.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Member texels, in discovery order
    pub cells: Vec<IVec2>,
    /// Shared quantized value
    pub bucket: Bucket,
    /// A texel outside the region, adjacent to it, with a strictly larger
    /// value. When several exist this is the last one met during traversal.
    pub larger_neighbor: Option<IVec2>,
}

impl Region {
    /// Per-axis mean of the member texels, rounded to the nearest texel.
    pub fn mean_position(&self) -> IVec2 {
        let mut sum_x: i64 = 0;
        let mut sum_y: i64 = 0;
        for c in &self.cells {
            sum_x += c.x as i64;
            sum_y += c.y as i64;
        }
        let n = self.cells.len().max(1) as f64;
        IVec2::new(
            round_to_int((sum_x as f64 / n) as f32),
            round_to_int((sum_y as f64 / n) as f32),
        )
    }

    /// True if no adjacent texel has a larger value
    pub fn is_local_maximum(&self) -> bool {
        self.larger_neighbor.is_none()
    }
}

/// Breadth-first region grouper with reusable scratch buffers.
///
/// Visited texels are tracked with per-pass stamps, so grouping a region
/// costs time proportional to the region and its border, not the field.
pub struct RegionGrouper {
    stamps: Vec<u32>,
    epoch: u32,
    queue: VecDeque<IVec2>,
}

impl RegionGrouper {
    /// Create a grouper for fields of `len` texels.
    pub fn new(len: usize) -> Self {
        Self {
            stamps: vec![0; len],
            epoch: 0,
            queue: VecDeque::new(),
        }
    }

    fn next_epoch(&mut self) {
        if self.epoch == u32::MAX {
            self.stamps.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
    }

    /// Flood-fill the region containing `start`.
    pub fn group(&mut self, field: &QuantizedField, start: IVec2) -> Region {
        debug_assert_eq!(self.stamps.len(), field.grid().len());
        self.next_epoch();
        let grid = field.grid();

        let bucket = field.bucket(start);
        let mut cells = vec![start];
        let mut larger_neighbor = None;

        self.queue.clear();
        self.queue.push_back(start);
        self.stamps[grid.index(start)] = self.epoch;

        while let Some(current) = self.queue.pop_front() {
            for neighbor in grid.neighbors8(current) {
                let idx = grid.index(neighbor);
                if self.stamps[idx] == self.epoch {
                    continue;
                }
                // Border texels are stamped too, so each is inspected once
                self.stamps[idx] = self.epoch;

                let value = field.bucket_at(idx);
                if value == bucket {
                    self.queue.push_back(neighbor);
                    cells.push(neighbor);
                } else if value > bucket {
                    larger_neighbor = Some(neighbor);
                }
            }
        }

        Region { cells, bucket, larger_neighbor }
    }
}
