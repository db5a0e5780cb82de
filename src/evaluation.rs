//! Static evaluation of a board.
//!
//! Scores are from White's point of view: positive favours White, negative
//! favours Black. Checkmate and stalemate are recognised first and dominate
//! every other term.

use crate::analyzer::{in_check, no_legal_moves};
use crate::board::Board;
use crate::piece::Color;

/// Score of a position in which Black has checkmated White is the negation.
pub const CHECKMATE_SCORE: i32 = 999_999;

/// Material values are in pawns; scores are in hundredths of a pawn.
const PAWN_SCALE: i32 = 100;

/// Centipawns per rank of average advancement. Only meant to break ties
/// between materially equal positions.
pub const ADVANCEMENT_WEIGHT: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Checkmated,
    Stalemated,
}

fn terminal(board: &Board, color: Color) -> Option<Terminal> {
    if !no_legal_moves(board, color) {
        return None;
    }
    if in_check(board, color) {
        Some(Terminal::Checkmated)
    } else {
        Some(Terminal::Stalemated)
    }
}

/// Evaluates `board` from White's perspective.
///
/// Checkmate of White scores `-CHECKMATE_SCORE`, checkmate of Black
/// `CHECKMATE_SCORE`, and stalemate of either side zero. Otherwise the
/// score is the material balance plus a small advancement term.
pub fn evaluate(board: &Board) -> i32 {
    match (terminal(board, Color::White), terminal(board, Color::Black)) {
        (Some(Terminal::Checkmated), _) => -CHECKMATE_SCORE,
        (_, Some(Terminal::Checkmated)) => CHECKMATE_SCORE,
        (Some(Terminal::Stalemated), _) | (_, Some(Terminal::Stalemated)) => 0,
        (None, None) => material_score(board) + advancement_score(board),
    }
}

/// Material balance in centipawns.
pub fn material_score(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, piece)| piece.color.sign() as i32 * piece.kind.value() * PAWN_SCALE)
        .sum()
}

/// Average forward progress of all pieces, each counted towards its own
/// side, weighted by [`ADVANCEMENT_WEIGHT`].
pub fn advancement_score(board: &Board) -> i32 {
    let mut total = 0i32;
    let mut count = 0i32;
    for (square, piece) in board.pieces() {
        let progress = match piece.color {
            Color::White => square.y() as i32,
            Color::Black => 7 - square.y() as i32,
        };
        total += piece.color.sign() as i32 * progress;
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    ADVANCEMENT_WEIGHT * total / count
}
