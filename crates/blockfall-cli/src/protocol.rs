//! Line-based protocol that feeds pieces to the player.
//!
//! ```text
//! TO      first line: falling piece and next piece
//! S       one line per turn: the piece that follows
//! X       the supply ends; the current falling piece is still played
//! E       stop right away
//! ```
//!
//! The second character of the first line may be `X` as well, for a supply
//! of a single piece. End of input behaves like `E`, and blank lines are
//! ignored.

use std::io::{self, BufRead};

use blockfall_engine::{NextPiece, PieceKind};

const EXHAUSTED: char = 'X';
const STOP: char = 'E';

/// One line of the protocol after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceToken {
    Piece(PieceKind),
    Exhausted,
    Stop,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum ProtocolError {
    #[display("line {line}: expected the first two pieces, got {found:?}")]
    InvalidHeader { line: usize, found: String },
    #[display("line {line}: expected a piece, `X` or `E`, got {found:?}")]
    InvalidToken { line: usize, found: String },
    #[display("failed to read protocol input")]
    Io(io::Error),
}

#[derive(Debug)]
pub(crate) struct ProtocolReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R> ProtocolReader<R>
where
    R: BufRead,
{
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        for line in self.lines.by_ref() {
            self.line += 1;
            let line = line.map_err(ProtocolError::Io)?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_owned()));
            }
        }
        Ok(None)
    }

    /// Reads the falling and next piece from the first non-blank line.
    ///
    /// Returns `None` if the input holds no such line.
    pub(crate) fn read_header(&mut self) -> Result<Option<(PieceKind, NextPiece)>, ProtocolError> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let line_number = self.line;
        let invalid = || ProtocolError::InvalidHeader {
            line: line_number,
            found: line.clone(),
        };

        let mut chars = line.chars();
        let (Some(first), Some(second), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let falling = PieceKind::from_char(first).ok_or_else(&invalid)?;
        let next = match second {
            EXHAUSTED => NextPiece::Exhausted,
            c => NextPiece::Ready(PieceKind::from_char(c).ok_or_else(&invalid)?),
        };
        Ok(Some((falling, next)))
    }

    /// Reads the token for the next turn, or `None` at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<PieceToken>, ProtocolError> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let mut chars = line.chars();
        let token = match (chars.next(), chars.next()) {
            (Some(EXHAUSTED), None) => Some(PieceToken::Exhausted),
            (Some(STOP), None) => Some(PieceToken::Stop),
            (Some(c), None) => PieceKind::from_char(c).map(PieceToken::Piece),
            _ => None,
        };
        token.map(Some).ok_or(ProtocolError::InvalidToken {
            line: self.line,
            found: line,
        })
    }
}
