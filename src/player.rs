//! Players: anything that can pick a move for one side.
//!
//! The game loop only ever asks a player for a move when that player has at
//! least one legal move; calling [`Player::choose_move`] otherwise is a
//! contract violation and panics. Front ends (for example a player driven
//! by mouse input) implement the same trait and validate the squares they
//! are given with [`Player::can_move_piece`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::chess_move::Move;
use crate::movegeneration::{has_legal_move, legal_moves_from};
use crate::piece::{Color, Piece, PieceKind};
use crate::search::{Search, SearchConfig, SearchResult};
use crate::square::Square;

pub trait Player {
    fn color(&self) -> Color;

    /// Picks a legal move for this player's color on `board`.
    ///
    /// # Panics
    ///
    /// If the player has no legal move.
    fn choose_move(&mut self, board: &Board) -> Move;

    /// Picks the piece a pawn of this player's color promotes to.
    fn choose_promoted_piece(&mut self) -> Piece;

    fn name(&self) -> &'static str;

    /// True if `square` holds one of this player's pieces and that piece
    /// has at least one legal move.
    fn can_move_piece(&self, board: &Board, square: Square) -> bool {
        board.piece(square).is_some_and(|piece| piece.color == self.color())
            && !legal_moves_from(board, square).is_empty()
    }
}

/// Plays a uniformly random legal move of a randomly picked piece.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    color: Color,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(color: Color) -> Self {
        RandomPlayer {
            color,
            rng: StdRng::from_entropy(),
        }
    }

    /// A player whose choices are reproducible.
    pub fn seeded(color: Color, seed: u64) -> Self {
        RandomPlayer {
            color,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Move {
        assert!(
            has_legal_move(board, self.color),
            "{} has no legal move to choose from",
            self.color
        );

        // Sample squares until one holds a piece of ours that can move.
        loop {
            let square = Square::new(self.rng.gen_range(0..8), self.rng.gen_range(0..8));
            if !board.piece(square).is_some_and(|piece| piece.color == self.color) {
                continue;
            }
            if let Some(mv) = legal_moves_from(board, square).choose(&mut self.rng) {
                return *mv;
            }
        }
    }

    fn choose_promoted_piece(&mut self) -> Piece {
        Piece::new(PieceKind::Queen, self.color)
    }

    fn name(&self) -> &'static str {
        "RandomPlayer"
    }
}

/// Picks moves with a minimax search.
#[derive(Debug, Clone)]
pub struct SearchPlayer {
    color: Color,
    search: Search,
    last_result: Option<SearchResult>,
}

impl SearchPlayer {
    pub fn new(color: Color, config: SearchConfig) -> Self {
        SearchPlayer {
            color,
            search: Search::new(config),
            last_result: None,
        }
    }

    /// Statistics of the most recent search, if any.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }
}

impl Player for SearchPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Move {
        let result = self.search.find_best_move(board, self.color);
        self.last_result = Some(result);
        match result.best_move {
            Some(mv) => mv,
            None => panic!(
                "search found no move for {}; choose_move requires a legal move",
                self.color
            ),
        }
    }

    fn choose_promoted_piece(&mut self) -> Piece {
        Piece::new(PieceKind::Queen, self.color)
    }

    fn name(&self) -> &'static str {
        "SearchPlayer"
    }
}
