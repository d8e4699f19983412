use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// L-piece.
    L = 2,
    /// J-piece.
    J = 3,
    /// Z-piece.
    Z = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Returns the occupancy pattern of this piece in the given rotation.
    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static Shape {
        &PIECE_SHAPES[self as usize][rotation.as_usize()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{_0}")]
pub struct PieceRotation(u8);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("rotation must be 0-3, got {rotation}")]
pub struct InvalidRotationError {
    rotation: u8,
}

impl TryFrom<u8> for PieceRotation {
    type Error = InvalidRotationError;

    fn try_from(rotation: u8) -> Result<Self, Self::Error> {
        Self::new(rotation).ok_or(InvalidRotationError { rotation })
    }
}

impl From<PieceRotation> for u8 {
    fn from(rotation: PieceRotation) -> Self {
        rotation.0
    }
}

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub const fn new(rotation: u8) -> Option<Self> {
        if (rotation as usize) < Self::LEN {
            Some(Self(rotation))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Occupancy pattern of a piece in one rotation, trimmed to its bounding box.
///
/// Every row and every column of the box holds at least one occupied cell, so
/// `width()` and `height()` are the real extent of the piece. Cell `(dx, dy)`
/// is `dx` columns right of and `dy` rows below the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: [u8; 4],
    width: u8,
    height: u8,
}

impl Shape {
    const fn new(width: u8, height: u8, rows: [u8; 4]) -> Self {
        Self {
            rows,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    #[must_use]
    pub const fn is_occupied(&self, dx: usize, dy: usize) -> bool {
        dx < self.width() && dy < self.height() && (self.rows[dy] & (1 << dx)) != 0
    }

    /// Iterates over the occupied cells as `(dx, dy)`, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height())
            .flat_map(move |dy| (0..self.width()).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| self.is_occupied(dx, dy))
    }

    /// Iterates over the rows of the shape as cell occupancy flags.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = bool> + '_> + '_ {
        (0..self.height()).map(move |dy| (0..self.width()).map(move |dx| self.is_occupied(dx, dy)))
    }

    /// Turns the shape 90° clockwise.
    ///
    /// Cell `(x, y)` of the result comes from cell `(y, height - 1 - x)`.
    const fn rotated_right(&self) -> Self {
        let mut rows = [0; 4];
        let mut y = 0;
        while y < self.width() {
            let mut x = 0;
            while x < self.height() {
                if self.is_occupied(y, self.height() - 1 - x) {
                    rows[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self::new(self.height, self.width, rows)
    }
}

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
const fn shape_rotations(shape: Shape) -> [Shape; 4] {
    let mut rotates = [shape; 4];
    let mut i = 1;
    while i < 4 {
        rotates[i] = rotates[i - 1].rotated_right();
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[Shape; 4]; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u8 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;

    [
        // I-piece
        shape_rotations(Shape::new(4, 1, [m([C, C, C, C]), 0, 0, 0])),
        // O-piece
        shape_rotations(Shape::new(2, 2, [m([C, C, E, E]), m([C, C, E, E]), 0, 0])),
        // L-piece
        shape_rotations(Shape::new(3, 2, [m([E, E, C, E]), m([C, C, C, E]), 0, 0])),
        // J-piece
        shape_rotations(Shape::new(3, 2, [m([C, E, E, E]), m([C, C, C, E]), 0, 0])),
        // Z-piece
        shape_rotations(Shape::new(3, 2, [m([C, C, E, E]), m([E, C, C, E]), 0, 0])),
        // S-piece
        shape_rotations(Shape::new(3, 2, [m([E, C, C, E]), m([C, C, E, E]), 0, 0])),
        // T-piece
        shape_rotations(Shape::new(3, 2, [m([E, C, E, E]), m([C, C, C, E]), 0, 0])),
    ]
};
