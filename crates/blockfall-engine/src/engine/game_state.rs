use serde::{Deserialize, Serialize};

use crate::{
    AdvanceError, NextPieceError,
    core::{BitGrid, PieceKind, Placement, ResolvedPlacement},
};

use super::game_stats::GameStats;

/// Grid row whose occupation ends the game.
pub const DEADLINE_ROW: usize = 4;

/// The next-piece slot of a [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextPiece {
    /// The previous turn consumed the next piece; the caller must supply one.
    Awaiting,
    /// The piece that becomes the falling piece after the current turn.
    Ready(PieceKind),
    /// The supply has ended; the current falling piece is the last one.
    Exhausted,
}

/// Snapshot of a game between two turns.
///
/// `GameState` is a value: [`advance`](Self::advance) and the `with_*`
/// methods return a new state and leave `self` untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameState, NextPiece, PieceKind, PieceRotation, Placement};
///
/// let state = GameState::new(PieceKind::O, NextPiece::Ready(PieceKind::T));
/// let next = state.advance(Placement::new(PieceRotation::SPAWN, 0))?;
///
/// assert_eq!(next.stats().placed_pieces(), 1);
/// assert_eq!(next.falling_piece(), Some(PieceKind::T));
/// assert_eq!(next.next_piece(), NextPiece::Awaiting);
///
/// let next = next.with_next_piece(PieceKind::I)?;
/// assert_eq!(next.next_piece(), NextPiece::Ready(PieceKind::I));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    grid: BitGrid,
    falling_piece: Option<PieceKind>,
    next_piece: NextPiece,
    deadline_touched: bool,
    stats: GameStats,
}

impl GameState {
    /// Creates the state at the start of a game: empty grid, zero statistics.
    #[must_use]
    pub fn new(falling_piece: PieceKind, next_piece: NextPiece) -> Self {
        Self::with_grid(BitGrid::EMPTY, falling_piece, next_piece)
    }

    /// Creates a state that starts from an arbitrary grid with zero statistics.
    #[must_use]
    pub fn with_grid(grid: BitGrid, falling_piece: PieceKind, next_piece: NextPiece) -> Self {
        Self {
            grid,
            falling_piece: Some(falling_piece),
            next_piece,
            deadline_touched: !grid.row(DEADLINE_ROW).is_empty(),
            stats: GameStats::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    /// The piece to be placed this turn.
    ///
    /// `None` once the last piece of an exhausted supply has been placed.
    #[must_use]
    pub fn falling_piece(&self) -> Option<PieceKind> {
        self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> NextPiece {
        self.next_piece
    }

    /// Whether any placement so far has left a block on [`DEADLINE_ROW`].
    #[must_use]
    pub fn is_deadline_touched(&self) -> bool {
        self.deadline_touched
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The game cannot continue: the deadline was touched or no piece is left.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.deadline_touched || self.falling_piece.is_none()
    }

    /// Resolves where the falling piece would land with the given placement.
    #[must_use]
    pub fn resolve(&self, placement: Placement) -> Option<ResolvedPlacement> {
        self.grid.resolve_placement(self.falling_piece?, placement)
    }

    /// Fills the next-piece slot left empty by the previous turn.
    pub fn with_next_piece(&self, kind: PieceKind) -> Result<Self, NextPieceError> {
        self.with_next_slot(NextPiece::Ready(kind))
    }

    /// Marks the piece supply as ended; the falling piece becomes the last one.
    pub fn with_supply_exhausted(&self) -> Result<Self, NextPieceError> {
        self.with_next_slot(NextPiece::Exhausted)
    }

    fn with_next_slot(&self, next_piece: NextPiece) -> Result<Self, NextPieceError> {
        match self.next_piece {
            NextPiece::Awaiting => Ok(Self {
                next_piece,
                ..self.clone()
            }),
            NextPiece::Ready(_) => Err(NextPieceError::AlreadySupplied),
            NextPiece::Exhausted => Err(NextPieceError::SupplyExhausted),
        }
    }

    /// Plays one turn: drops the falling piece with `placement`, clears full
    /// rows and updates the statistics.
    ///
    /// The returned state's falling piece is this state's next piece, and its
    /// next-piece slot is [`NextPiece::Awaiting`] (or stays
    /// [`NextPiece::Exhausted`]).
    ///
    /// The deadline is checked on the grid before line clearing, so a piece
    /// reaching [`DEADLINE_ROW`] ends the game even if its row is cleared.
    pub fn advance(&self, placement: Placement) -> Result<Self, AdvanceError> {
        let kind = self.falling_piece.ok_or(AdvanceError::NoFallingPiece)?;
        let (falling_piece, next_piece) = match self.next_piece {
            NextPiece::Awaiting => return Err(AdvanceError::NextPieceMissing),
            NextPiece::Ready(next) => (Some(next), NextPiece::Awaiting),
            NextPiece::Exhausted => (None, NextPiece::Exhausted),
        };

        let resolved = self.grid.resolve_placement(kind, placement).ok_or(
            AdvanceError::NoLegalPlacement {
                kind,
                rotation: placement.rotation(),
                column: placement.column(),
            },
        )?;

        let mut grid = self.grid;
        grid.fill_shape(resolved.shape(), resolved.column(), resolved.row())
            .map_err(AdvanceError::Collision)?;
        let deadline_touched = self.deadline_touched || !grid.row(DEADLINE_ROW).is_empty();

        let (grid, cleared_rows) = grid.clear_full_rows();
        let mut stats = self.stats.clone();
        stats.complete_piece_drop(cleared_rows.len());

        Ok(Self {
            grid,
            falling_piece,
            next_piece,
            deadline_touched,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::PieceRotation;

    use super::*;

    fn placement(rotation: u8, column: usize) -> Placement {
        Placement::new(PieceRotation::new(rotation).unwrap(), column)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(PieceKind::I, NextPiece::Ready(PieceKind::O));
        assert_eq!(state.grid(), &BitGrid::EMPTY);
        assert_eq!(state.falling_piece(), Some(PieceKind::I));
        assert_eq!(state.next_piece(), NextPiece::Ready(PieceKind::O));
        assert!(!state.is_deadline_touched());
        assert!(!state.is_game_over());
        assert_eq!(state.stats(), &GameStats::new());
    }

    #[test]
    fn test_advance_places_piece_and_shifts_pieces() {
        let state = GameState::new(PieceKind::T, NextPiece::Ready(PieceKind::S));
        let next = state.advance(placement(0, 3)).unwrap();

        let expected = BitGrid::from_ascii(
            r"
            ....#.....
            ...###....
            ",
        );
        assert_eq!(next.grid(), &expected);
        assert_eq!(next.falling_piece(), Some(PieceKind::S));
        assert_eq!(next.next_piece(), NextPiece::Awaiting);
        assert_eq!(next.stats().placed_pieces(), 1);
        assert_eq!(next.stats().score(), 0);

        // The source state is untouched
        assert_eq!(state.grid(), &BitGrid::EMPTY);
        assert_eq!(state.stats().placed_pieces(), 0);
    }

    #[test]
    fn test_advance_requires_next_piece() {
        let state = GameState::new(PieceKind::T, NextPiece::Ready(PieceKind::S));
        let next = state.advance(placement(0, 0)).unwrap();
        assert!(matches!(
            next.advance(placement(0, 0)),
            Err(AdvanceError::NextPieceMissing)
        ));

        let next = next.with_next_piece(PieceKind::Z).unwrap();
        assert!(next.advance(placement(0, 0)).is_ok());
    }

    #[test]
    fn test_next_piece_can_only_be_supplied_once() {
        let state = GameState::new(PieceKind::T, NextPiece::Ready(PieceKind::S));
        assert!(matches!(
            state.with_next_piece(PieceKind::I),
            Err(NextPieceError::AlreadySupplied)
        ));
        assert!(matches!(
            state.with_supply_exhausted(),
            Err(NextPieceError::AlreadySupplied)
        ));
    }

    #[test]
    fn test_advance_rejects_illegal_placement() {
        let state = GameState::new(PieceKind::I, NextPiece::Ready(PieceKind::S));
        assert!(matches!(
            state.advance(placement(0, 7)),
            Err(AdvanceError::NoLegalPlacement {
                kind: PieceKind::I,
                column: 7,
                ..
            })
        ));
        assert!(matches!(
            state.advance(placement(1, usize::MAX)),
            Err(AdvanceError::NoLegalPlacement {
                column: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_exhausted_supply_plays_last_piece() {
        let state = GameState::new(PieceKind::O, NextPiece::Exhausted);
        assert!(matches!(
            state.with_next_piece(PieceKind::I),
            Err(NextPieceError::SupplyExhausted)
        ));

        let last = state.advance(placement(0, 0)).unwrap();
        assert_eq!(last.falling_piece(), None);
        assert_eq!(last.next_piece(), NextPiece::Exhausted);
        assert_eq!(last.stats().placed_pieces(), 1);
        assert!(last.is_game_over());
        assert!(!last.is_deadline_touched());
        assert!(matches!(
            last.advance(placement(0, 0)),
            Err(AdvanceError::NoFallingPiece)
        ));
        assert_eq!(last.resolve(placement(0, 0)), None);
    }

    #[test]
    fn test_line_clear_updates_stats() {
        let grid = BitGrid::from_ascii(
            r"
            ####..####
            ####..####
            ",
        );
        let state = GameState::with_grid(grid, PieceKind::O, NextPiece::Ready(PieceKind::I));
        let next = state.advance(placement(0, 4)).unwrap();

        assert_eq!(next.grid(), &BitGrid::EMPTY);
        assert_eq!(next.stats().score(), 300);
        assert_eq!(next.stats().total_cleared_lines(), 2);
        assert_eq!(next.stats().line_clears(2), 1);
        assert_eq!(next.stats().line_clears(1), 0);
    }

    #[test]
    fn test_single_line_clear_scores_100() {
        let mut state = GameState::new(PieceKind::I, NextPiece::Ready(PieceKind::I));
        state = state.advance(placement(0, 0)).unwrap();
        state = state.with_next_piece(PieceKind::O).unwrap();
        state = state.advance(placement(0, 4)).unwrap();
        state = state.with_next_piece(PieceKind::T).unwrap();
        assert_eq!(state.stats().score(), 0);

        // The O fills columns 8-9 of the two bottom rows, completing row 19
        state = state.advance(placement(0, 8)).unwrap();
        assert_eq!(state.stats().score(), 100);
        assert_eq!(state.stats().line_clears(1), 1);
        assert_eq!(state.stats().total_cleared_lines(), 1);
        assert_eq!(state.stats().placed_pieces(), 3);
        assert_eq!(
            state.grid(),
            &BitGrid::from_ascii(
                r"
                ........##
                ",
            )
        );
    }

    #[test]
    fn test_deadline_is_sticky() {
        let grid = BitGrid::from_ascii(
            r"
            ..........
            #########.
            #########.
            #########.
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            .#########
            ",
        );
        let state = GameState::with_grid(grid, PieceKind::I, NextPiece::Ready(PieceKind::O));
        assert!(!state.is_deadline_touched());

        // Vertical I in column 9 covers rows 4-7 and completes rows 5-7
        let next = state.advance(placement(1, 9)).unwrap();
        assert!(next.is_deadline_touched());
        assert!(next.grid().row(DEADLINE_ROW).is_empty());
        assert_eq!(next.stats().line_clears(3), 1);
        assert_eq!(next.stats().score(), 500);

        let next = next
            .with_next_piece(PieceKind::T)
            .unwrap()
            .advance(placement(0, 4))
            .unwrap();
        assert!(next.is_deadline_touched());
        assert!(next.is_game_over());
    }

    #[test]
    fn test_game_state_serialization() {
        let state = GameState::new(PieceKind::L, NextPiece::Ready(PieceKind::J))
            .advance(placement(2, 5))
            .unwrap();
        let serialized = serde_json::to_string(&state).unwrap();
        let deserialized: GameState = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, state);
    }
}
