//! Grid module - bounds-checked dense 2D storage
//!
//! Every buffer in the simulation (framebuffer, height field, speckle field,
//! level cells) is a `Grid`. Storage is a flat row-major `Vec` for cache
//! locality; every coordinate access goes through [`Grid::index`], so
//! out-of-range reads return `None` instead of touching a neighbouring row.

/// Dense row-major 2D array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index of `(x, y)`, or `None` when outside the grid.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Read `(x, y)`, or `fallback` when the coordinate is outside the grid.
    ///
    /// This is the edge-clamp policy used by neighbourhood sampling: callers
    /// pass the nearest in-range sample as the fallback.
    #[inline]
    pub fn get_or(&self, x: i32, y: i32, fallback: T) -> T {
        self.get(x, y).unwrap_or(fallback)
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        match self.index(x, y) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Write `(x, y)`. Returns false if out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// One row as a slice, or `None` when `y` is out of range.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_return_none() {
        let grid = Grid::new(4, 3, 7u8);
        assert_eq!(grid.get(0, 0), Some(7));
        assert_eq!(grid.get(3, 2), Some(7));
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn out_of_range_writes_are_rejected() {
        let mut grid = Grid::new(4, 3, 0u16);
        assert!(grid.set(1, 2, 9));
        assert!(!grid.set(4, 0, 9));
        assert!(!grid.set(0, -1, 9));
        assert_eq!(grid.as_slice().iter().filter(|&&v| v == 9).count(), 1);
        assert_eq!(grid.row(2).unwrap()[1], 9);
    }

    #[test]
    fn get_or_uses_fallback_only_outside() {
        let mut grid = Grid::new(2, 2, 1i32);
        grid.set(1, 1, 5);
        assert_eq!(grid.get_or(1, 1, -1), 5);
        assert_eq!(grid.get_or(2, 1, -1), -1);
    }
}
