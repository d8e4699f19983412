use std::{fmt::Write, iter, ops::Range};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::PieceCollisionError;

use super::{GRID_HEIGHT, GRID_WIDTH, piece::Shape};

// All ten cells occupied
const FULL_ROW_MASK: u16 = (1 << GRID_WIDTH) - 1;

/// Indices of the rows removed by a line clear, in ascending order.
pub type ClearedRows = ArrayVec<usize, GRID_HEIGHT>;

/// Single row in the bit grid representation.
///
/// Stores one row of the grid as a 16-bit bitmask where bit `x` holds the
/// occupancy of column `x`. Bits 10-15 are always zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRow {
    bits: u16,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if all ten cells of the row are occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if the cell at column `x` is occupied.
    ///
    /// Columns outside the grid are reported as empty.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        x < GRID_WIDTH && (self.bits & (1 << x)) != 0
    }

    /// Number of occupied cells in the row.
    #[inline]
    #[must_use]
    pub fn occupied_count(self) -> u32 {
        self.bits.count_ones()
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    /// Iterates over the cells of the row from left to right.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..GRID_WIDTH).map(move |x| (self.bits & (1 << x)) != 0)
    }
}

/// The 20×10 playing field as a binary occupancy matrix.
///
/// Row 0 is the top of the field and row 19 the bottom; column 0 is the left
/// wall side. The dimensions never change: placements only set cells and line
/// clears only move whole rows.
///
/// `BitGrid` is a small `Copy` value, so every game state owns its grid
/// outright and successive states never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitGrid {
    rows: [BitRow; GRID_HEIGHT],
}

impl Default for BitGrid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for BitGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "0000,0000,...,03ff" (comma-separated hex values, top row first)
        let mut hex_string = String::with_capacity(GRID_HEIGHT * 5);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{:04x}", row.bits)
                .map_err(<S::Error as serde::ser::Error>::custom)?;
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for BitGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != GRID_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                GRID_HEIGHT,
                parts.len()
            )));
        }

        let mut rows = [BitRow::EMPTY; GRID_HEIGHT];
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has bits outside the {GRID_WIDTH} columns: {hex_str}"
                )));
            }
            rows[i] = BitRow { bits };
        }

        Ok(BitGrid { rows })
    }
}

impl BitGrid {
    pub const WIDTH: usize = GRID_WIDTH;
    pub const HEIGHT: usize = GRID_HEIGHT;
    pub const X_RANGE: Range<usize> = 0..GRID_WIDTH;
    pub const Y_RANGE: Range<usize> = 0..GRID_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BitRow::EMPTY; GRID_HEIGHT],
    };

    #[must_use]
    pub fn row(&self, y: usize) -> BitRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        y < GRID_HEIGHT && self.rows[y].is_cell_occupied(x)
    }

    /// Cells of row `y` from left to right, framed by the occupied side walls.
    ///
    /// Yields `WIDTH + 2` values; the first and last are always `true`.
    pub fn row_with_walls(&self, y: usize) -> impl Iterator<Item = bool> + '_ {
        iter::once(true)
            .chain(self.rows[y].iter_cells())
            .chain(iter::once(true))
    }

    /// Cells of column `x` from top to bottom, framed by an occupied ceiling
    /// and floor.
    ///
    /// Yields `HEIGHT + 2` values; the first and last are always `true`.
    pub fn column_with_walls(&self, x: usize) -> impl Iterator<Item = bool> + '_ {
        iter::once(true)
            .chain(self.rows.iter().map(move |row| row.is_cell_occupied(x)))
            .chain(iter::once(true))
    }

    /// Row index of the topmost occupied cell in each column.
    ///
    /// Empty columns report [`BitGrid::HEIGHT`].
    #[must_use]
    pub fn column_tops(&self) -> [usize; GRID_WIDTH] {
        let mut tops = [GRID_HEIGHT; GRID_WIDTH];
        for (x, top) in tops.iter_mut().enumerate() {
            if let Some(y) = self.rows.iter().position(|row| row.is_cell_occupied(x)) {
                *top = y;
            }
        }
        tops
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> u32 {
        self.rows.iter().map(|row| row.occupied_count()).sum()
    }

    /// Locks a shape onto the grid with its top-left corner at (`column`, `row`).
    ///
    /// Fails without touching the grid if any cell of the shape lies outside the
    /// grid or on an occupied cell.
    pub fn fill_shape(
        &mut self,
        shape: &Shape,
        column: usize,
        row: usize,
    ) -> Result<(), PieceCollisionError> {
        if column > GRID_WIDTH - shape.width() || row > GRID_HEIGHT - shape.height() {
            return Err(PieceCollisionError);
        }
        if shape
            .occupied_cells()
            .any(|(dx, dy)| self.rows[row + dy].is_cell_occupied(column + dx))
        {
            return Err(PieceCollisionError);
        }
        for (dx, dy) in shape.occupied_cells() {
            self.rows[row + dy].occupy_cell(column + dx);
        }
        Ok(())
    }

    /// Indices of all completely filled rows, ascending.
    #[must_use]
    pub fn full_rows(&self) -> ClearedRows {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_y, row)| row.is_filled())
            .map(|(y, _row)| y)
            .collect()
    }

    /// Number of occupied cells across the given rows.
    #[must_use]
    pub fn occupied_count_in_rows(&self, rows: &[usize]) -> u32 {
        rows.iter().map(|&y| self.rows[y].occupied_count()).sum()
    }

    /// Removes all filled rows at once and returns the resulting grid together
    /// with the indices (in the original grid) of the removed rows.
    ///
    /// Rows above a removed row move down; one empty row enters at the top for
    /// every removed row. The relative order of the surviving rows is kept.
    #[must_use]
    pub fn clear_full_rows(&self) -> (Self, ClearedRows) {
        let cleared = self.full_rows();
        if cleared.is_empty() {
            return (*self, cleared);
        }

        let mut grid = *self;
        let mut count = 0;
        for y in (0..GRID_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            grid.rows[y + count] = self.rows[y];
        }
        grid.rows[..count].fill(BitRow::EMPTY);

        (grid, cleared)
    }

    /// Creates a `BitGrid` from ASCII art.
    ///
    /// '#' represents an occupied cell, '.' an empty cell. Every row must have
    /// exactly 10 cells. Rows are listed top to bottom and aligned to the
    /// bottom of the grid, so short pictures describe the lowest rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have 10 cells or there are more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= GRID_HEIGHT,
            "At most {GRID_HEIGHT} rows are allowed, got {}",
            lines.len()
        );
        let offset = GRID_HEIGHT - lines.len();

        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                GRID_WIDTH,
                "Each row must have exactly {GRID_WIDTH} cells, got {} at row {i}",
                chars.len(),
            );

            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    grid.rows[offset + i].occupy_cell(x);
                }
            }
        }
        grid
    }
}
