//! Placement evaluation: scoring individual piece placements.
//!
//! The [`FeatureBasedPlacementEvaluator`] computes placement scores as a weighted
//! sum of raw board features:
//!
//! ```text
//! score = w₁·f₁ + w₂·f₂ + ... + wₙ·fₙ
//! ```
//!
//! The default weights ([`FeatureBasedPlacementEvaluator::dellacherie`]) are
//! fixed constants:
//!
//! | feature | weight |
//! |---|---|
//! | holes | -4 |
//! | hole depth | 0 (reported only) |
//! | well cells | -1 |
//! | row transitions | -1 |
//! | column transitions | -1 |
//! | landing height | -1 |
//! | landing height above 6 | -1 |
//! | eroded cells | +1 |
//!
//! # Usage
//!
//! ```
//! use blockfall_engine::{BitGrid, PieceKind, PieceRotation, Placement};
//! use blockfall_evaluator::{
//!     placement_analysis::PlacementAnalysis,
//!     placement_evaluator::{FeatureBasedPlacementEvaluator, PlacementEvaluator},
//! };
//!
//! let grid = BitGrid::EMPTY;
//! let placement = Placement::new(PieceRotation::SPAWN, 4);
//! let resolved = grid.resolve_placement(PieceKind::O, placement).unwrap();
//! let analysis = PlacementAnalysis::from_grid(&grid, resolved)?;
//!
//! let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
//! assert_eq!(evaluator.evaluate_placement(&analysis), -65.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{fmt, iter};

use serde::Serialize;

use crate::{
    board_feature::{
        BoardFeatureSource, ColumnTransitions, ErodedCells, LandingHeight, LandingHeightExcess,
        NumHoles, NumWellCells, RowTransitions, SumOfHoleDepth,
    },
    placement_analysis::PlacementAnalysis,
};

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (higher is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;

    /// Like [`evaluate_placement`](Self::evaluate_placement), with the
    /// contribution of every feature.
    fn explain_placement(&self, analysis: &PlacementAnalysis) -> FeatureBreakdown;
}

/// Per-feature contributions to a placement score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBreakdown {
    pub score: f32,
    pub features: Vec<FeatureContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub id: &'static str,
    pub name: &'static str,
    pub raw: f32,
    pub weight: f32,
}

impl FeatureContribution {
    #[must_use]
    pub fn weighted(&self) -> f32 {
        self.raw * self.weight
    }
}

impl FeatureBreakdown {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FeatureContribution> {
        self.features.iter().find(|feature| feature.id == id)
    }
}

/// Feature-based placement evaluator using a weighted sum of raw features.
#[derive(Debug, Clone)]
pub struct FeatureBasedPlacementEvaluator {
    features: Vec<&'static dyn BoardFeatureSource>,
    weights: Vec<f32>,
}

impl Default for FeatureBasedPlacementEvaluator {
    fn default() -> Self {
        Self::dellacherie()
    }
}

impl FeatureBasedPlacementEvaluator {
    /// Creates a new feature-based placement evaluator.
    ///
    /// # Panics
    ///
    /// Panics if `features.len() != weights.len()`
    #[must_use]
    pub fn new(features: Vec<&'static dyn BoardFeatureSource>, weights: Vec<f32>) -> Self {
        assert_eq!(features.len(), weights.len());
        Self { features, weights }
    }

    /// The fixed evaluation used for play, after Pierre Dellacherie's
    /// one-piece heuristic.
    #[must_use]
    pub fn dellacherie() -> Self {
        Self::new(
            vec![
                &NumHoles,
                &SumOfHoleDepth,
                &NumWellCells,
                &RowTransitions,
                &ColumnTransitions,
                &LandingHeight,
                &LandingHeightExcess,
                &ErodedCells,
            ],
            vec![-4.0, 0.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0],
        )
    }
}

impl PlacementEvaluator for FeatureBasedPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        iter::zip(&self.features, &self.weights)
            .map(|(f, w)| f.extract_raw(analysis) * w)
            .sum()
    }

    fn explain_placement(&self, analysis: &PlacementAnalysis) -> FeatureBreakdown {
        let features: Vec<_> = iter::zip(&self.features, &self.weights)
            .map(|(f, &weight)| FeatureContribution {
                id: f.id(),
                name: f.name(),
                raw: f.extract_raw(analysis),
                weight,
            })
            .collect();
        FeatureBreakdown {
            score: features.iter().map(FeatureContribution::weighted).sum(),
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BitGrid, PieceKind, PieceRotation, Placement};

    use super::*;

    fn analyze(grid: &BitGrid, kind: PieceKind, rotation: u8, column: usize) -> PlacementAnalysis {
        let placement = Placement::new(PieceRotation::new(rotation).unwrap(), column);
        let resolved = grid.resolve_placement(kind, placement).unwrap();
        PlacementAnalysis::from_grid(grid, resolved).unwrap()
    }

    fn assert_score(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_o_piece_scores_on_empty_grid() {
        let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
        // Against a wall the row transitions drop from 4 to 2 per occupied row
        assert_score(evaluator.evaluate_placement(&analyze(&BitGrid::EMPTY, PieceKind::O, 0, 0)), -61.0);
        assert_score(evaluator.evaluate_placement(&analyze(&BitGrid::EMPTY, PieceKind::O, 0, 4)), -65.0);
        assert_score(evaluator.evaluate_placement(&analyze(&BitGrid::EMPTY, PieceKind::O, 0, 8)), -61.0);
    }

    #[test]
    fn test_line_clear_is_rewarded() {
        let grid = BitGrid::from_ascii(
            r"
            ####..####
            ####..####
            ",
        );
        let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
        // row transitions 36, column transitions 20, landing height 1, eroded 40
        assert_score(evaluator.evaluate_placement(&analyze(&grid, PieceKind::O, 0, 4)), -17.0);
    }

    #[test]
    fn test_holes_weigh_four() {
        let grid = BitGrid::from_ascii(
            r"
            #.........
            ",
        );
        let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
        // O over columns 0-1 rests on the block at (0, 19), leaving a hole at (1, 19)
        let analysis = analyze(&grid, PieceKind::O, 0, 0);
        assert_eq!(analysis.placement().row(), 17);
        let breakdown = evaluator.explain_placement(&analysis);
        assert_score(breakdown.get("num_holes").unwrap().raw, 1.0);
        assert_score(breakdown.get("num_holes").unwrap().weighted(), -4.0);
        assert_score(breakdown.get("sum_of_hole_depth").unwrap().raw, 2.0);
        assert_score(breakdown.get("sum_of_hole_depth").unwrap().weighted(), 0.0);
    }

    #[test]
    fn test_breakdown_matches_score() {
        let grid = BitGrid::from_ascii(
            r"
            ..#.......
            .##..#....
            ####.##.##
            ",
        );
        let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
        for kind in PieceKind::ALL {
            for placement in Placement::all() {
                let Some(resolved) = grid.resolve_placement(kind, placement) else {
                    continue;
                };
                let analysis = PlacementAnalysis::from_grid(&grid, resolved).unwrap();
                let breakdown = evaluator.explain_placement(&analysis);
                assert_score(breakdown.score, evaluator.evaluate_placement(&analysis));
                assert_eq!(breakdown.features.len(), 8);
            }
        }
    }

    #[test]
    fn test_breakdown_serialization() {
        let evaluator = FeatureBasedPlacementEvaluator::dellacherie();
        let breakdown = evaluator.explain_placement(&analyze(&BitGrid::EMPTY, PieceKind::O, 0, 4));
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["score"], -65.0);
        assert_eq!(json["features"][0]["id"], "num_holes");
        assert_eq!(json["features"][3]["raw"], 44.0);
    }
}
