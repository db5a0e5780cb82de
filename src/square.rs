//! Board coordinates.
//!
//! A [`Square`] is a plain `(x, y)` pair where `x` is the file (0 = a) and
//! `y` is the rank (0 = rank 1). Coordinates outside `0..8` are allowed to
//! exist so that move generation can step off the board freely; such a
//! square is *invalid* and must be checked with [`Square::is_valid`] before
//! it is used to index a board.

use std::fmt;
use std::str::FromStr;

use crate::error::SquareParseError;

#[derive(Debug, Clone, Copy)]
pub struct Square {
    x: i8,
    y: i8,
}

impl Square {
    /// Sentinel for "not found". Never equal to anything, itself included.
    pub const INVALID: Square = Square { x: -1, y: -1 };

    /// Creates a square from raw coordinates. The result may be invalid.
    pub const fn new(x: i8, y: i8) -> Square {
        Square { x, y }
    }

    /// Returns true if both coordinates are on the board.
    pub const fn is_valid(&self) -> bool {
        self.x >= 0 && self.x < 8 && self.y >= 0 && self.y < 8
    }

    /// File index, 0 for the a-file.
    pub const fn x(&self) -> i8 {
        self.x
    }

    /// Rank index, 0 for the first rank.
    pub const fn y(&self) -> i8 {
        self.y
    }

    /// Returns the square displaced by `(dx, dy)`. May leave the board.
    pub const fn offset(&self, dx: i8, dy: i8) -> Square {
        Square::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance between two squares.
    pub fn squared_distance(&self, other: Square) -> i32 {
        let dx = (other.x - self.x) as i32;
        let dy = (other.y - self.y) as i32;
        dx * dx + dy * dy
    }

    /// Iterates over all 64 squares, rank 8 first, files a to h.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8i8)
            .rev()
            .flat_map(|y| (0..8i8).map(move |x| Square::new(x, y)))
    }
}

/// Two squares are equal only when both are valid and share coordinates.
impl PartialEq for Square {
    fn eq(&self, other: &Square) -> bool {
        self.is_valid() && other.is_valid() && self.x == other.x && self.y == other.y
    }
}

/// Parse algebraic notation like "e4" into a Square.
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareParseError::WrongLength);
        }

        let file = bytes[0].to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = bytes[1];
        if !(b'1'..=b'8').contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        Ok(Square::new((file - b'a') as i8, (rank - b'1') as i8))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "--");
        }
        write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y + 1)
    }
}
