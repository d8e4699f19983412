//! Board features used to score placements.
//!
//! Each feature source extracts one raw measurement from a
//! [`PlacementAnalysis`]. Sources carry no weight themselves; weighting is the
//! job of the [placement evaluator](crate::placement_evaluator).
//!
//! **Structure features** - Measured on the grid after placement:
//! - [`NumHoles`] - Count of covered empty cells
//! - [`SumOfHoleDepth`] - Blocks stacked above holes
//! - [`NumWellCells`] - Empty cells enclosed left and right
//! - [`RowTransitions`] - Horizontal fragmentation
//! - [`ColumnTransitions`] - Vertical fragmentation
//!
//! **Placement features** - Measured on the placed piece:
//! - [`LandingHeight`] - Height at which the piece comes to rest
//! - [`LandingHeightExcess`] - Landing height above a threshold
//! - [`ErodedCells`] - Line clear reward

use std::fmt;

use crate::placement_analysis::PlacementAnalysis;

/// Every feature source, in the order of the default evaluator.
pub const ALL_BOARD_FEATURE_SOURCES: [&dyn BoardFeatureSource; 8] = [
    &NumHoles,
    &SumOfHoleDepth,
    &NumWellCells,
    &RowTransitions,
    &ColumnTransitions,
    &LandingHeight,
    &LandingHeightExcess,
    &ErodedCells,
];

pub trait BoardFeatureSource: fmt::Debug + Send + Sync {
    /// Stable identifier, used as key in serialized breakdowns.
    #[must_use]
    fn id(&self) -> &'static str;
    #[must_use]
    fn name(&self) -> &'static str;
    #[must_use]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Number of holes (empty cells with at least one occupied cell above them).
///
/// # Raw measurement
///
/// For each column, every empty cell below the topmost occupied cell is a hole.
/// `raw = total count of holes across all columns`
#[derive(Debug, Clone, Copy)]
pub struct NumHoles;

impl BoardFeatureSource for NumHoles {
    fn id(&self) -> &'static str {
        "num_holes"
    }
    fn name(&self) -> &'static str {
        "Number of Holes"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.board_analysis().num_holes() as f32
    }
}

/// Cumulative hole depth.
///
/// # Raw measurement
///
/// For each hole, count the occupied cells above it in its column.
/// `raw = Σ(blocks above each hole)`
#[derive(Debug, Clone, Copy)]
pub struct SumOfHoleDepth;

impl BoardFeatureSource for SumOfHoleDepth {
    fn id(&self) -> &'static str {
        "sum_of_hole_depth"
    }
    fn name(&self) -> &'static str {
        "Sum of Hole Depth"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.board_analysis().sum_of_hole_depth() as f32
    }
}

/// Number of well cells.
///
/// # Raw measurement
///
/// An empty cell is a well cell when both its left and right neighbours are
/// occupied or walls.
/// `raw = count of well cells across the grid`
#[derive(Debug, Clone, Copy)]
pub struct NumWellCells;

impl BoardFeatureSource for NumWellCells {
    fn id(&self) -> &'static str {
        "num_well_cells"
    }
    fn name(&self) -> &'static str {
        "Number of Well Cells"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.board_analysis().num_well_cells() as f32
    }
}

/// Horizontal occupancy changes.
///
/// # Raw measurement
///
/// For each row framed by the two side walls, count adjacent cell pairs whose
/// occupancy differs.
/// `raw = Σ(transitions per row)`
#[derive(Debug, Clone, Copy)]
pub struct RowTransitions;

impl BoardFeatureSource for RowTransitions {
    fn id(&self) -> &'static str {
        "row_transitions"
    }
    fn name(&self) -> &'static str {
        "Row Transitions"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.board_analysis().row_transitions() as f32
    }
}

/// Vertical occupancy changes.
///
/// # Raw measurement
///
/// For each column framed by an occupied ceiling and floor, count adjacent cell
/// pairs whose occupancy differs.
/// `raw = Σ(transitions per column)`
#[derive(Debug, Clone, Copy)]
pub struct ColumnTransitions;

impl BoardFeatureSource for ColumnTransitions {
    fn id(&self) -> &'static str {
        "column_transitions"
    }
    fn name(&self) -> &'static str {
        "Column Transitions"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.board_analysis().column_transitions() as f32
    }
}

/// Landing height of the placed piece.
///
/// # Raw measurement
///
/// `raw = 20 - (top row of the piece + piece height / 2)`, measured before
/// line clearing.
#[derive(Debug, Clone, Copy)]
pub struct LandingHeight;

impl BoardFeatureSource for LandingHeight {
    fn id(&self) -> &'static str {
        "landing_height"
    }
    fn name(&self) -> &'static str {
        "Landing Height"
    }
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.landing_height()
    }
}

/// Landing height beyond [`LandingHeightExcess::THRESHOLD`].
///
/// # Raw measurement
///
/// `raw = max(0, landing_height - THRESHOLD)`
#[derive(Debug, Clone, Copy)]
pub struct LandingHeightExcess;

impl LandingHeightExcess {
    pub const THRESHOLD: f32 = 6.0;
}

impl BoardFeatureSource for LandingHeightExcess {
    fn id(&self) -> &'static str {
        "landing_height_excess"
    }
    fn name(&self) -> &'static str {
        "Landing Height Above 6"
    }
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        (analysis.landing_height() - Self::THRESHOLD).max(0.0)
    }
}

/// Eroded piece cells.
///
/// # Raw measurement
///
/// `raw = lines cleared × occupied cells in the cleared rows`
#[derive(Debug, Clone, Copy)]
pub struct ErodedCells;

impl BoardFeatureSource for ErodedCells {
    fn id(&self) -> &'static str {
        "eroded_cells"
    }
    fn name(&self) -> &'static str {
        "Eroded Cells"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, analysis: &PlacementAnalysis) -> f32 {
        analysis.eroded_cells() as f32
    }
}
