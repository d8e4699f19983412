use serde::{Deserialize, Serialize};

use super::{
    GRID_HEIGHT, GRID_WIDTH,
    bit_grid::BitGrid,
    piece::{PieceKind, PieceRotation, Shape},
};

/// A candidate move: the rotation of the falling piece and the column of the
/// left edge of its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    rotation: PieceRotation,
    column: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(rotation: PieceRotation, column: usize) -> Self {
        Self { rotation, column }
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// All 40 candidate placements, rotation-major and column-minor, ascending.
    pub fn all() -> impl Iterator<Item = Placement> {
        PieceRotation::ALL
            .into_iter()
            .flat_map(|rotation| (0..GRID_WIDTH).map(move |column| Placement::new(rotation, column)))
    }
}

/// A placement together with the row its shape comes to rest at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlacement {
    kind: PieceKind,
    placement: Placement,
    row: usize,
}

impl ResolvedPlacement {
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.placement.rotation
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.placement.column
    }

    /// Row of the top edge of the shape.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.placement.rotation)
    }

    /// Grid coordinates `(x, y)` covered by the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let (column, row) = (self.column(), self.row);
        self.shape()
            .occupied_cells()
            .map(move |(dx, dy)| (column + dx, row + dy))
    }
}

impl BitGrid {
    /// Drops a piece straight down in the given rotation and column.
    ///
    /// Candidate rows are tried from the bottom of the grid upwards. A row is
    /// accepted when every occupied cell of the shape lies inside the grid, on
    /// an empty cell, with no occupied cell anywhere above it in its column: the
    /// piece falls in from the top and cannot pass through blocks. The lowest
    /// accepted row wins.
    ///
    /// Returns `None` if no row is accepted, which is the case for every row
    /// when the shape sticks out of the side of the grid.
    #[must_use]
    pub fn resolve_placement(
        &self,
        kind: PieceKind,
        placement: Placement,
    ) -> Option<ResolvedPlacement> {
        let shape = kind.shape(placement.rotation());
        let column = placement.column();
        if column > GRID_WIDTH - shape.width() {
            return None;
        }

        // A cell is free and unobstructed iff it lies strictly above the top block of its column.
        let tops = self.column_tops();
        let fits = |row: usize| {
            shape.occupied_cells().all(|(dx, dy)| {
                let y = row + dy;
                y < GRID_HEIGHT && y < tops[column + dx]
            })
        };

        (0..GRID_HEIGHT)
            .rev()
            .find(|&row| fits(row))
            .map(|row| ResolvedPlacement {
                kind,
                placement,
                row,
            })
    }
}
