//! Evaluator system for choosing where to drop each piece.
//!
//! This crate implements a two-level evaluation architecture:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - Scores a single piece
//!    placement as a weighted sum of board features.
//!
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - Selects the placement for the
//!    current turn by scoring every legal placement and breaking ties by position.
//!
//! # Architecture
//!
//! ```text
//! Turn Evaluation (select placement, play sessions)
//!     ↓ uses
//! Placement Evaluation (score single placement)
//!     ↓ uses
//! Board Features (raw measurements)
//! ```
//!
//! # Supporting Modules
//!
//! - [`board_analysis`] - Lazy-evaluated grid metrics (holes, wells, transitions)
//! - [`placement_analysis`] - Grid right after a placement, before line clearing,
//!   together with the landing height and eroded cells
//! - [`board_feature`] - Named feature sources extracting raw values
//!
//! # Example
//!
//! ```
//! use blockfall_engine::PieceSequence;
//! use blockfall_evaluator::turn_evaluator::TurnEvaluator;
//!
//! let evaluator = TurnEvaluator::default();
//! let state = evaluator.play_session(PieceSequence::new(1, 50))?.unwrap();
//!
//! assert!(state.is_game_over());
//! println!("score: {}", state.stats().score());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod board_analysis;
pub mod board_feature;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod turn_evaluator;
