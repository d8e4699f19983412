//! Turn-level game logic built on the core data structures.
//!
//! - [`GameState`] - Immutable snapshot between turns (grid, falling and next piece,
//!   deadline flag, statistics)
//! - [`GameStats`] - Score, placed pieces and line clear distribution
//! - [`PieceSequence`] - Seeded, finite piece supply
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] from the first two pieces of the supply
//! 2. Choose a [`Placement`](crate::Placement) for the falling piece
//! 3. [`GameState::advance`] drops it, clears full rows and promotes the next piece
//! 4. Supply the following piece with [`GameState::with_next_piece`], or end the
//!    supply with [`GameState::with_supply_exhausted`]
//! 5. Repeat until [`GameState::is_game_over`]
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameState, NextPiece, PieceSequence, Placement};
//!
//! let mut pieces = PieceSequence::new(3, 8);
//! let first = pieces.next().unwrap();
//! let second = pieces.next().unwrap();
//! let mut state = GameState::new(first, NextPiece::Ready(second));
//!
//! while !state.is_game_over() {
//!     // Take the first legal placement
//!     let placement = Placement::all()
//!         .find(|&placement| state.resolve(placement).is_some())
//!         .unwrap();
//!     state = state.advance(placement)?;
//!     if state.falling_piece().is_some() {
//!         state = match pieces.next() {
//!             Some(kind) => state.with_next_piece(kind)?,
//!             None => state.with_supply_exhausted()?,
//!         };
//!     }
//! }
//!
//! assert!(state.stats().placed_pieces() <= 8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{game_state::*, game_stats::*, piece_sequence::*};

mod game_state;
mod game_stats;
mod piece_sequence;
