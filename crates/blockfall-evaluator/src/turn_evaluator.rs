//! Turn evaluation: selecting the placement for the current turn.
//!
//! # How It Works
//!
//! 1. **Enumerate Placements** - Every rotation (major) and column (minor), ascending
//! 2. **Score Each Placement** - Resolve the drop row and score the resulting grid
//! 3. **Select Best** - Keep the best candidate, then apply a positional tie-break
//!
//! The best set is reduced by eviction: a candidate scoring at least as high as
//! the best so far replaces the whole set. Among equal scores the candidate
//! enumerated last therefore survives. The tie-break
//! ([`placement_priority`]) then picks the survivor that is furthest from the
//! spawn column, preferring the left side.
//!
//! # Design: Greedy One-Step Lookahead
//!
//! The [`TurnEvaluator`] only looks at the current falling piece. The next piece
//! is known but not used for planning.
//!
//! # Usage
//!
//! ```
//! use blockfall_engine::{GameState, NextPiece, PieceKind};
//! use blockfall_evaluator::turn_evaluator::TurnEvaluator;
//!
//! let evaluator = TurnEvaluator::default();
//! let state = GameState::new(PieceKind::O, NextPiece::Ready(PieceKind::T));
//!
//! let plan = evaluator.select_best_move(&state)?;
//! let state = state.advance(plan.placement().placement())?;
//! assert_eq!(state.stats().placed_pieces(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use arrayvec::ArrayVec;
use blockfall_engine::{
    AdvanceError, BitGrid, GameState, NextPiece, NextPieceError, PieceCollisionError, PieceKind,
    PieceRotation, Placement, ResolvedPlacement,
};

use crate::{
    placement_analysis::PlacementAnalysis,
    placement_evaluator::{FeatureBasedPlacementEvaluator, FeatureBreakdown, PlacementEvaluator},
};

const NUM_PLACEMENTS: usize = PieceRotation::LEN * BitGrid::WIDTH;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SelectMoveError {
    #[display("no falling piece to place")]
    NoFallingPiece,
    #[display("no legal placement for {kind}")]
    NoLegalMove { kind: PieceKind },
    #[display("resolved placement collides: {_0}")]
    Collision(PieceCollisionError),
}

/// Failure while playing a whole sequence of turns.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PlayError {
    #[display("failed to select a move: {_0}")]
    SelectMove(SelectMoveError),
    #[display("failed to advance the game: {_0}")]
    Advance(AdvanceError),
    #[display("failed to supply the next piece: {_0}")]
    NextPiece(NextPieceError),
}

/// The placement chosen for a turn, with its analysis and score.
#[derive(Debug, Clone)]
pub struct MovePlan {
    placement: ResolvedPlacement,
    analysis: PlacementAnalysis,
    score: f32,
}

impl MovePlan {
    #[must_use]
    pub fn placement(&self) -> &ResolvedPlacement {
        &self.placement
    }

    #[must_use]
    pub fn analysis(&self) -> &PlacementAnalysis {
        &self.analysis
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Tie-break priority of a placement among equally scored candidates.
///
/// `100 × |column + width / 2 - 4.5| + 10 × (9 - column)`: the distance of the
/// piece centre from the middle of the grid dominates, then the leftmost column.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn placement_priority(placement: &ResolvedPlacement) -> f32 {
    let column = placement.column() as f32;
    let width = placement.shape().width() as f32;
    let rightmost = (BitGrid::WIDTH - 1) as f32;
    100.0 * (column + width / 2.0 - 4.5).abs() + 10.0 * (rightmost - column)
}

/// Evaluates and selects the placement for the current turn.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl Default for TurnEvaluator<'_> {
    fn default() -> Self {
        Self::new(Box::new(FeatureBasedPlacementEvaluator::dellacherie()))
    }
}

impl<'a> TurnEvaluator<'a> {
    /// Creates a new turn evaluator with the given placement evaluator.
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Per-feature breakdown of a planned move.
    #[must_use]
    pub fn explain(&self, plan: &MovePlan) -> FeatureBreakdown {
        self.placement_evaluator.explain_placement(&plan.analysis)
    }

    /// Selects the placement for the falling piece of `state`.
    ///
    /// Fails if there is no falling piece or no placement resolves; the latter
    /// cannot happen while the game is not over. A resolved placement that
    /// collides with the grid is reported as [`SelectMoveError::Collision`].
    pub fn select_best_move(&self, state: &GameState) -> Result<MovePlan, SelectMoveError> {
        let kind = state
            .falling_piece()
            .ok_or(SelectMoveError::NoFallingPiece)?;
        let grid = state.grid();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_moves = ArrayVec::<MovePlan, NUM_PLACEMENTS>::new();

        for placement in Placement::all() {
            let Some(resolved) = grid.resolve_placement(kind, placement) else {
                continue;
            };
            let analysis =
                PlacementAnalysis::from_grid(grid, resolved).map_err(SelectMoveError::Collision)?;
            let score = self.placement_evaluator.evaluate_placement(&analysis);
            if score >= best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(MovePlan {
                    placement: resolved,
                    analysis,
                    score,
                });
            }
        }

        let mut best_move = None;
        let mut best_priority = f32::NEG_INFINITY;
        for plan in best_moves {
            let priority = placement_priority(&plan.placement);
            if priority > best_priority {
                best_priority = priority;
                best_move = Some(plan);
            }
        }

        best_move.ok_or(SelectMoveError::NoLegalMove { kind })
    }

    /// Plays `pieces` from an empty grid until the game is over.
    ///
    /// The first two pieces start the game; every following piece is supplied
    /// after the turn that frees the next-piece slot, and the end of `pieces`
    /// exhausts the supply. Returns `None` if `pieces` is empty.
    pub fn play_session<I>(&self, pieces: I) -> Result<Option<GameState>, PlayError>
    where
        I: IntoIterator<Item = PieceKind>,
    {
        self.play_session_with(pieces, |_, _| {})
    }

    /// Like [`play_session`](Self::play_session), calling `on_turn` with the
    /// chosen move and the resulting state after every turn.
    pub fn play_session_with<I, F>(
        &self,
        pieces: I,
        mut on_turn: F,
    ) -> Result<Option<GameState>, PlayError>
    where
        I: IntoIterator<Item = PieceKind>,
        F: FnMut(&MovePlan, &GameState),
    {
        let mut pieces = pieces.into_iter();
        let Some(first) = pieces.next() else {
            return Ok(None);
        };
        let next = pieces.next().map_or(NextPiece::Exhausted, NextPiece::Ready);
        let mut state = GameState::new(first, next);

        loop {
            let plan = self.select_best_move(&state)?;
            state = state.advance(plan.placement.placement())?;
            on_turn(&plan, &state);
            if state.is_game_over() {
                break;
            }
            state = match pieces.next() {
                Some(kind) => state.with_next_piece(kind)?,
                None => state.with_supply_exhausted()?,
            };
        }

        Ok(Some(state))
    }
}
