//! Dense 2D grid addressed by texel coordinates.

use crate::core::types::IVec2;

/// Offsets of the 8 neighbors: the 4 direct neighbors, then the 4 diagonals.
pub const NEIGHBOR_OFFSETS_8: [IVec2; 8] = [
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
];

/// Row-major `width x height` grid. Cell `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Proximity field: one intensity per texel, conceptually in [0, 1].
pub type ScalarField = Grid<f32>;

/// Per-texel flags, used for examined cells and peak markers.
pub type CellMask = Grid<bool>;

impl<T: Clone + Default> Grid<T> {
    /// Create a grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Reset every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Wrap row-major cells. Returns None if the length doesn't match.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a texel coordinate lies inside the grid
    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Linear index of an in-bounds texel
    #[inline]
    pub fn index(&self, pos: IVec2) -> usize {
        debug_assert!(self.in_bounds(pos), "texel {pos} outside {}x{}", self.width, self.height);
        pos.y as usize * self.width + pos.x as usize
    }

    /// Texel coordinate of a linear index
    #[inline]
    pub fn position(&self, index: usize) -> IVec2 {
        IVec2::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Cell at `pos`, or None outside the grid
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<&T> {
        if self.in_bounds(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    /// Mutable cell at `pos`, or None outside the grid
    #[inline]
    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Set the cell at `pos`. Returns false (and writes nothing) outside the grid.
    pub fn set(&mut self, pos: IVec2, value: T) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// In-bounds 8-neighbors of `pos`, in `NEIGHBOR_OFFSETS_8` order.
    pub fn neighbors8(&self, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        NEIGHBOR_OFFSETS_8
            .iter()
            .map(move |&offset| pos + offset)
            .filter(|&n| self.in_bounds(n))
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> &[T] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on 0; an empty grid simply has no rows
        self.cells.chunks_exact(self.width.max(1)).take(self.height)
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Build a grid of the same shape by mapping every cell
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl CellMask {
    /// Number of set cells
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl ScalarField {
    /// Largest value in the field (0.0 for an empty field)
    pub fn max_value(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    /// Raise the cell at `pos` to `value` if it is currently lower.
    ///
    /// Returns true if the cell changed. Out-of-bounds positions are ignored.
    pub fn raise(&mut self, pos: IVec2, value: f32) -> bool {
        match self.get_mut(pos) {
            Some(cell) if *cell < value => {
                *cell = value;
                true
            }
            _ => false,
        }
    }
}
