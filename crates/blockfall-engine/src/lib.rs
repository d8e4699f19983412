//! Deterministic rules of the blockfall puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - The 20x10 [`BitGrid`], the shape catalog ([`PieceKind`],
//!   [`PieceRotation`], [`Shape`]) and drop resolution ([`Placement`],
//!   [`ResolvedPlacement`])
//! - [`engine`] - Turn transitions ([`GameState`]), statistics ([`GameStats`]) and
//!   the seeded piece supply ([`PieceSequence`])
//!
//! Everything here is pure and synchronous; choosing a placement is left to the
//! caller.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with occupied cells or grid bounds")]
pub struct PieceCollisionError;

/// Reasons [`GameState::advance`] refuses to play a turn.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AdvanceError {
    #[display("no falling piece left to place")]
    NoFallingPiece,
    #[display("next piece has not been supplied")]
    NextPieceMissing,
    #[display("no legal placement for {kind} with rotation {rotation} at column {column}")]
    NoLegalPlacement {
        kind: PieceKind,
        rotation: PieceRotation,
        column: usize,
    },
    #[display("{_0}")]
    Collision(PieceCollisionError),
}

/// Reasons the next-piece slot of a [`GameState`] cannot be filled.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NextPieceError {
    #[display("next piece already supplied")]
    AlreadySupplied,
    #[display("piece supply already exhausted")]
    SupplyExhausted,
}
