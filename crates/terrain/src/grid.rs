use serde::{Deserialize, Serialize};

/// Row-major lattice of elevation readings; `None` cells have no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<f64>>,
}

impl ElevationGrid {
    pub(crate) fn new(width: usize, height: usize, cells: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reading at column `ix`, row `iy`; `None` when out of range or without data.
    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.width || iy >= self.height {
            return None;
        }
        self.cells[iy * self.width + ix]
    }

    /// Lowest and highest readings among cells that have data.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.cells.iter().flatten().fold(None, |acc, &e| match acc {
            None => Some((e, e)),
            Some((lo, hi)) => Some((lo.min(e), hi.max(e))),
        })
    }
}
