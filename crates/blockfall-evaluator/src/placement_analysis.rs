//! Analysis of a grid right after a piece has been placed.
//!
//! [`PlacementAnalysis`] combines what is specific to the placement (where the
//! piece landed, which rows it completes) with the structural metrics of the
//! resulting grid via [`BoardAnalysis`].
//!
//! Everything is measured on the grid *after* the piece is placed and *before*
//! the completed rows are cleared.

use blockfall_engine::{BitGrid, ClearedRows, PieceCollisionError, ResolvedPlacement};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: ResolvedPlacement,
    cleared_rows: ClearedRows,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Places the piece on a copy of `before_placement` and analyzes the result.
    pub fn from_grid(
        before_placement: &BitGrid,
        placement: ResolvedPlacement,
    ) -> Result<Self, PieceCollisionError> {
        let mut grid = *before_placement;
        grid.fill_shape(placement.shape(), placement.column(), placement.row())?;

        Ok(Self {
            placement,
            cleared_rows: grid.full_rows(),
            board_analysis: BoardAnalysis::from_grid(&grid),
        })
    }

    #[must_use]
    pub fn placement(&self) -> &ResolvedPlacement {
        &self.placement
    }

    /// Rows completed by the placement, ascending.
    #[must_use]
    pub fn cleared_rows(&self) -> &[usize] {
        &self.cleared_rows
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_rows.len()
    }

    /// Analysis of the grid with the piece placed and no row cleared yet.
    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// Height of the piece's vertical centre above the floor.
    ///
    /// `HEIGHT - (row + piece_height / 2)`, where `row` is the row of the top
    /// edge of the piece.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn landing_height(&self) -> f32 {
        let row = self.placement.row() as f32;
        let height = self.placement.shape().height() as f32;
        BitGrid::HEIGHT as f32 - (row + height / 2.0)
    }

    /// Number of completed rows times the number of occupied cells in them.
    #[must_use]
    pub fn eroded_cells(&self) -> u32 {
        let lines = u32::try_from(self.cleared_lines()).unwrap_or(u32::MAX);
        lines
            * self
                .board_analysis
                .grid()
                .occupied_count_in_rows(&self.cleared_rows)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceKind, PieceRotation, Placement};

    use super::*;

    fn analyze(grid: &BitGrid, kind: PieceKind, rotation: u8, column: usize) -> PlacementAnalysis {
        let placement = Placement::new(PieceRotation::new(rotation).unwrap(), column);
        let resolved = grid.resolve_placement(kind, placement).unwrap();
        PlacementAnalysis::from_grid(grid, resolved).unwrap()
    }

    #[test]
    fn test_landing_height() {
        let grid = BitGrid::EMPTY;
        assert!((analyze(&grid, PieceKind::O, 0, 4).landing_height() - 1.0).abs() < f32::EPSILON);
        assert!((analyze(&grid, PieceKind::I, 0, 0).landing_height() - 0.5).abs() < f32::EPSILON);
        assert!((analyze(&grid, PieceKind::I, 1, 0).landing_height() - 2.0).abs() < f32::EPSILON);
        assert!((analyze(&grid, PieceKind::T, 0, 0).landing_height() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_analysis_sees_grid_before_clearing() {
        let grid = BitGrid::from_ascii(
            r"
            ####..####
            ####..####
            ",
        );
        let analysis = analyze(&grid, PieceKind::O, 0, 4);
        assert_eq!(analysis.placement().row(), 18);
        assert_eq!(analysis.cleared_rows(), &[18, 19]);
        assert_eq!(analysis.cleared_lines(), 2);
        assert!(analysis.board_analysis().grid().row(19).is_filled());
        // 2 lines times 20 cells
        assert_eq!(analysis.eroded_cells(), 40);
    }

    #[test]
    fn test_no_clear_no_erosion() {
        let analysis = analyze(&BitGrid::EMPTY, PieceKind::S, 0, 0);
        assert!(analysis.cleared_rows().is_empty());
        assert_eq!(analysis.eroded_cells(), 0);
    }

    #[test]
    fn test_single_clear_erosion() {
        let grid = BitGrid::from_ascii(
            r"
            ###.######
            ",
        );
        let analysis = analyze(&grid, PieceKind::I, 1, 3);
        assert_eq!(analysis.cleared_rows(), &[19]);
        assert_eq!(analysis.eroded_cells(), 10);
    }

    #[test]
    fn test_colliding_placement_is_rejected() {
        let grid = BitGrid::EMPTY;
        let resolved = grid
            .resolve_placement(PieceKind::O, Placement::new(PieceRotation::SPAWN, 0))
            .unwrap();
        let mut occupied = grid;
        occupied
            .fill_shape(resolved.shape(), resolved.column(), resolved.row())
            .unwrap();
        assert!(PlacementAnalysis::from_grid(&occupied, resolved).is_err());
    }
}
