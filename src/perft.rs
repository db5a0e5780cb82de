//! Move-path enumeration for verifying move generation.
//!
//! Counts every leaf of the legal move tree to a fixed depth and tallies
//! what kind of move led to it. Promotions count once per destination,
//! since the promoted piece is chosen after the move; each branch continues
//! with a queen.

use crate::analyzer::in_check;
use crate::board::Board;
use crate::movegeneration::legal_moves;
use crate::piece::{Color, PieceKind};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Perft {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl Perft {
    pub fn new() -> Self {
        Perft::default()
    }

    /// Counts the leaves `depth` plies below `board` with `color` to move.
    /// Tallies accumulate over repeated calls.
    pub fn run(&mut self, board: &Board, color: Color, depth: u32) -> u64 {
        if depth == 0 {
            self.nodes += 1;
            return 1;
        }

        let mut count = 0;
        for mv in legal_moves(board, color) {
            let mut sim = board.clone();
            let captured = mv.play_turn(&mut sim, color, PieceKind::Queen);

            if depth == 1 {
                self.captures += captured.is_some() as u64;
                self.en_passants += mv.is_en_passant() as u64;
                self.castles += mv.is_castle() as u64;
                self.promotions += mv.is_promotion() as u64;
                self.checks += in_check(&sim, color.opponent()) as u64;
            }
            count += self.run(&sim, color.opponent(), depth - 1);
        }
        count
    }
}

/// Leaf count only.
pub fn perft(board: &Board, color: Color, depth: u32) -> u64 {
    Perft::new().run(board, color, depth)
}

/// Leaf count below each root move, for narrowing down a mismatch.
pub fn divide(board: &Board, color: Color, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    legal_moves(board, color)
        .into_iter()
        .map(|mv| {
            let mut sim = board.clone();
            mv.play_turn(&mut sim, color, PieceKind::Queen);
            (mv.to_string(), perft(&sim, color.opponent(), depth - 1))
        })
        .collect()
}
