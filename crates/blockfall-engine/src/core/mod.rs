//! Core data structures: the grid, the shape catalog and placement resolution.

pub use self::{bit_grid::*, piece::*, placement::*};

pub(crate) mod bit_grid;
pub(crate) mod piece;
pub(crate) mod placement;

pub(crate) const GRID_WIDTH: usize = 10;
pub(crate) const GRID_HEIGHT: usize = 20;
