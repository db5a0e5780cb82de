//! Error types for parsing board coordinates and positions.
//!
//! The rule engine itself never fails: invalid squares are represented by a
//! sentinel and missing moves by empty lists. These errors only cover text
//! input handed to the engine from outside.

use thiserror::Error;

/// Error returned when algebraic square notation cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SquareParseError {
    /// Square notation must be exactly 2 characters
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    /// File must be a letter from a-h
    #[error("file must be a-h")]
    BadFile,
    /// Rank must be a digit from 1-8
    #[error("rank must be 1-8")]
    BadRank,
}

/// Error returned when a FEN string cannot be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN string: expected at least 2 fields, found {0}")]
    MissingFields(usize),

    #[error("invalid FEN string: expected 8 ranks, found {0}")]
    WrongRankCount(usize),

    #[error("invalid FEN string: rank {rank} does not describe 8 files")]
    BadRankLength { rank: usize },

    #[error("invalid character in piece placement: '{0}'")]
    BadPiece(char),

    #[error("invalid active color: '{0}'")]
    BadActiveColor(String),

    #[error("invalid character in castling rights: '{0}'")]
    BadCastling(char),

    #[error("invalid en passant square: {0}")]
    BadEnPassant(#[from] SquareParseError),

    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: &'static str, count: usize },
}
