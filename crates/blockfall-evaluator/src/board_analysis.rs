//! Lazily computed structural metrics of a grid.
//!
//! [`BoardAnalysis`] wraps a grid and computes each metric on first access,
//! so features that need only a few metrics do not pay for the rest.

use std::cell::OnceCell;

use blockfall_engine::BitGrid;

#[derive(Debug, Clone)]
pub struct BoardAnalysis {
    grid: BitGrid,
    column_tops: OnceCell<[usize; BitGrid::WIDTH]>,
    num_holes: OnceCell<u32>,
    sum_of_hole_depth: OnceCell<u32>,
    num_well_cells: OnceCell<u32>,
    row_transitions: OnceCell<u32>,
    column_transitions: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_grid(grid: &BitGrid) -> Self {
        Self {
            grid: *grid,
            column_tops: OnceCell::new(),
            num_holes: OnceCell::new(),
            sum_of_hole_depth: OnceCell::new(),
            num_well_cells: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    /// Row of the topmost occupied cell per column ([`BitGrid::HEIGHT`] if empty).
    #[must_use]
    pub fn column_tops(&self) -> &[usize; BitGrid::WIDTH] {
        self.column_tops.get_or_init(|| self.grid.column_tops())
    }

    /// Empty cells with at least one occupied cell somewhere above them.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            let mut holes = 0;
            for (x, &top) in self.column_tops().iter().enumerate() {
                for y in top..BitGrid::HEIGHT {
                    if !self.grid.is_occupied(x, y) {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }

    /// Sum over all holes of the number of occupied cells above the hole.
    #[must_use]
    pub fn sum_of_hole_depth(&self) -> u32 {
        *self.sum_of_hole_depth.get_or_init(|| {
            let mut depth_sum = 0;
            for x in BitGrid::X_RANGE {
                let mut blocks_above = 0;
                for y in BitGrid::Y_RANGE {
                    if self.grid.is_occupied(x, y) {
                        blocks_above += 1;
                    } else {
                        depth_sum += blocks_above;
                    }
                }
            }
            depth_sum
        })
    }

    /// Empty cells whose left and right neighbours are both occupied.
    ///
    /// The side walls count as occupied.
    #[must_use]
    pub fn num_well_cells(&self) -> u32 {
        *self.num_well_cells.get_or_init(|| {
            let mut wells = 0;
            for y in BitGrid::Y_RANGE {
                let cells: Vec<bool> = self.grid.row_with_walls(y).collect();
                for w in cells.windows(3) {
                    if w[0] && !w[1] && w[2] {
                        wells += 1;
                    }
                }
            }
            wells
        })
    }

    /// Occupancy changes between horizontally adjacent cells, walls included.
    ///
    /// Every row contributes 11 pairs, so an empty row counts 2 transitions.
    #[must_use]
    pub fn row_transitions(&self) -> u32 {
        *self.row_transitions.get_or_init(|| {
            BitGrid::Y_RANGE
                .map(|y| count_transitions(self.grid.row_with_walls(y)))
                .sum()
        })
    }

    /// Occupancy changes between vertically adjacent cells, with an occupied
    /// ceiling and floor.
    ///
    /// Every column contributes 21 pairs, so an empty column counts 2 transitions.
    #[must_use]
    pub fn column_transitions(&self) -> u32 {
        *self.column_transitions.get_or_init(|| {
            BitGrid::X_RANGE
                .map(|x| count_transitions(self.grid.column_with_walls(x)))
                .sum()
        })
    }
}

fn count_transitions(mut cells: impl Iterator<Item = bool>) -> u32 {
    let Some(mut prev_occupied) = cells.next() else {
        return 0;
    };
    let mut transitions = 0;
    for occupied in cells {
        if occupied != prev_occupied {
            transitions += 1;
        }
        prev_occupied = occupied;
    }
    transitions
}
