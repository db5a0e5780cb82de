//! Turn-by-turn driver for a game between two players.

use std::fmt;

use tracing::{debug, info};

use crate::analyzer::{checkmate, in_check, stalemate};
use crate::board::Board;
use crate::chess_move::Move;
use crate::error::FenError;
use crate::movegeneration::legal_moves_from;
use crate::piece::{Color, PieceKind};
use crate::player::Player;
use crate::square::Square;

/// Plies after which a game is declared drawn.
pub const DEFAULT_MAX_MOVES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    MoveLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => {
                write!(f, "{} is in checkmate, {} wins", winner.opponent(), winner)
            }
            Outcome::Stalemate => write!(f, "stalemate, tie game"),
            Outcome::MoveLimit => write!(f, "move limit reached, tie game"),
        }
    }
}

pub struct Game {
    board: Board,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    to_move: Color,
    ply: u32,
    max_moves: u32,
    last_move: Option<Move>,
    outcome: Option<Outcome>,
}

impl Game {
    /// A game from the standard starting position.
    ///
    /// # Panics
    ///
    /// If `white` or `black` does not play the color of its seat.
    pub fn new(white: Box<dyn Player>, black: Box<dyn Player>) -> Game {
        Game::with_board(Board::standard(), Color::White, white, black)
    }

    pub fn from_fen(
        fen: &str,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
    ) -> Result<Game, FenError> {
        let (board, to_move) = Board::from_fen(fen)?;
        Ok(Game::with_board(board, to_move, white, black))
    }

    fn with_board(
        board: Board,
        to_move: Color,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
    ) -> Game {
        assert_eq!(white.color(), Color::White, "white seat needs a White player");
        assert_eq!(black.color(), Color::Black, "black seat needs a Black player");
        Game {
            board,
            white,
            black,
            to_move,
            ply: 0,
            max_moves: DEFAULT_MAX_MOVES,
            last_move: None,
            outcome: None,
        }
    }

    pub fn with_max_moves(mut self, max_moves: u32) -> Game {
        self.max_moves = max_moves;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Plies played so far.
    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// King square of the side to move if it is in check.
    pub fn check_square(&self) -> Option<Square> {
        in_check(&self.board, self.to_move).then(|| self.board.king_square(self.to_move))
    }

    /// Destinations of the legal moves of the piece on `square`.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        legal_moves_from(&self.board, square)
            .into_iter()
            .map(|mv| mv.to())
            .collect()
    }

    /// Plays one ply, or returns the outcome if the game is over.
    ///
    /// The side to move is checked for checkmate, stalemate and the move
    /// limit before it is asked for a move. After the move a pawn that
    /// reached the last rank is replaced by the mover's chosen piece and the
    /// opponent's en passant window closes.
    pub fn step(&mut self) -> Option<Outcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        if let Some(outcome) = self.detect_outcome() {
            info!(ply = self.ply, %outcome, "game over");
            self.outcome = Some(outcome);
            return Some(outcome);
        }

        let mover = self.to_move;
        if let Some(king) = self.check_square() {
            debug!(color = %mover, %king, "in check");
        }
        let player = match mover {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        let mv = player.choose_move(&self.board);
        let captured = mv.execute(&mut self.board);

        if let Some(square) = self.board.pending_promotion(mover) {
            let piece = player.choose_promoted_piece();
            assert!(
                matches!(
                    piece.kind,
                    PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
                ),
                "{} cannot promote to {:?}",
                player.name(),
                piece.kind
            );
            self.board.promote(square, piece.kind);
            info!(%square, kind = ?piece.kind, "pawn promoted");
        }
        self.board.finish_turn(mover);

        info!(
            ply = self.ply,
            player = player.name(),
            color = %mover,
            %mv,
            captured = ?captured.map(|piece| piece.kind),
            "move played"
        );

        self.last_move = Some(mv);
        self.to_move = mover.opponent();
        self.ply += 1;
        None
    }

    /// Plays until the game ends.
    pub fn run(&mut self) -> Outcome {
        info!(
            white = self.white.name(),
            black = self.black.name(),
            "game started"
        );
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn detect_outcome(&self) -> Option<Outcome> {
        if checkmate(&self.board, self.to_move) {
            Some(Outcome::Checkmate {
                winner: self.to_move.opponent(),
            })
        } else if stalemate(&self.board, self.to_move) {
            Some(Outcome::Stalemate)
        } else if self.ply >= self.max_moves {
            Some(Outcome::MoveLimit)
        } else {
            None
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("white", &self.white.name())
            .field("black", &self.black.name())
            .field("to_move", &self.to_move)
            .field("ply", &self.ply)
            .field("last_move", &self.last_move)
            .field("outcome", &self.outcome)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegeneration::legal_moves;
    use crate::piece::Piece;
    use crate::player::{RandomPlayer, SearchPlayer};
    use crate::search::SearchConfig;

    /// Plays a fixed list of moves, looked up among the legal ones.
    struct Scripted {
        color: Color,
        moves: Vec<&'static str>,
        promote_to: PieceKind,
    }

    impl Scripted {
        fn new(color: Color, moves: &[&'static str]) -> Box<Scripted> {
            Box::new(Scripted {
                color,
                moves: moves.iter().rev().copied().collect(),
                promote_to: PieceKind::Queen,
            })
        }
    }

    impl Player for Scripted {
        fn color(&self) -> Color {
            self.color
        }

        fn choose_move(&mut self, board: &Board) -> Move {
            let wanted = self.moves.pop().expect("script has a move left");
            legal_moves(board, self.color)
                .into_iter()
                .find(|mv| mv.to_string() == wanted)
                .expect("scripted move is legal")
        }

        fn choose_promoted_piece(&mut self) -> Piece {
            Piece::new(self.promote_to, self.color)
        }

        fn name(&self) -> &'static str {
            "Scripted"
        }
    }

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new(
            Scripted::new(Color::White, &["f2f3", "g2g4"]),
            Scripted::new(Color::Black, &["e7e5", "d8h4"]),
        );
        assert_eq!(game.run(), Outcome::Checkmate { winner: Color::Black });
        assert_eq!(game.ply(), 4);
        assert_eq!(game.last_move().unwrap().to_string(), "d8h4");
        assert_eq!(game.check_square(), Some(sq("e1")));
        // finished games stay finished
        assert_eq!(game.step(), Some(Outcome::Checkmate { winner: Color::Black }));
    }

    #[test]
    fn test_stalemate_ends_game() {
        let mut game = Game::from_fen(
            "7k/8/6K1/8/8/8/8/5Q2 w - - 0 1",
            Scripted::new(Color::White, &["f1f7"]),
            Scripted::new(Color::Black, &[]),
        )
        .unwrap();
        assert_eq!(game.run(), Outcome::Stalemate);
        assert_eq!(game.to_move(), Color::Black);
    }

    #[test]
    fn test_move_limit() {
        let mut game = Game::new(
            Box::new(RandomPlayer::seeded(Color::White, 1)),
            Box::new(RandomPlayer::seeded(Color::Black, 2)),
        )
        .with_max_moves(6);
        let outcome = game.run();
        assert!(game.ply() <= 6);
        if game.ply() == 6 {
            assert_eq!(outcome, Outcome::MoveLimit);
        }
    }

    #[test]
    fn test_random_game_terminates() {
        let mut game = Game::new(
            Box::new(RandomPlayer::seeded(Color::White, 11)),
            Box::new(RandomPlayer::seeded(Color::Black, 12)),
        );
        let outcome = game.run();
        assert!(game.ply() <= DEFAULT_MAX_MOVES);
        assert_eq!(game.outcome(), Some(outcome));
        // both kings survive every game
        assert!(game.board().king_square(Color::White).is_valid());
        assert!(game.board().king_square(Color::Black).is_valid());
    }

    #[test]
    fn test_promotion_uses_player_choice() {
        let mut white = Scripted::new(Color::White, &["a7a8"]);
        white.promote_to = PieceKind::Knight;
        let mut game = Game::from_fen(
            "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            white,
            Scripted::new(Color::Black, &[]),
        )
        .unwrap()
        .with_max_moves(1);
        assert_eq!(game.step(), None);
        let piece = game.board().piece(sq("a8")).unwrap();
        assert!(piece.is(PieceKind::Knight, Color::White));
        assert!(!piece.promotion_pending);
        assert_eq!(game.run(), Outcome::MoveLimit);
    }

    fn promote_a7_to(kind: PieceKind) {
        let mut white = Scripted::new(Color::White, &["a7a8"]);
        white.promote_to = kind;
        let mut game = Game::from_fen(
            "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            white,
            Scripted::new(Color::Black, &[]),
        )
        .unwrap();
        game.step();
    }

    #[test]
    #[should_panic(expected = "cannot promote to King")]
    fn test_promotion_to_king_rejected() {
        promote_a7_to(PieceKind::King);
    }

    #[test]
    #[should_panic(expected = "cannot promote to Pawn")]
    fn test_promotion_to_pawn_rejected() {
        promote_a7_to(PieceKind::Pawn);
    }

    #[test]
    fn test_en_passant_window_closes_after_one_turn() {
        let mut game = Game::from_fen(
            "4k3/4p3/8/3P4/8/8/8/4K3 b - - 0 1",
            Scripted::new(Color::White, &["e1d1"]),
            Scripted::new(Color::Black, &["e7e5", "e8d8"]),
        )
        .unwrap();
        game.step();
        assert!(game.legal_destinations(sq("d5")).contains(&sq("e6")));

        // White passes up the capture; the window shuts
        game.step();
        game.step();
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.legal_destinations(sq("d5")), vec![sq("d6")]);
    }

    #[test]
    fn test_legal_destinations() {
        let game = Game::new(
            Box::new(RandomPlayer::seeded(Color::White, 0)),
            Box::new(RandomPlayer::seeded(Color::Black, 0)),
        );
        let mut knight = game.legal_destinations(sq("g1"));
        knight.sort_by_key(|s| s.x());
        assert_eq!(knight, vec![sq("f3"), sq("h3")]);
        assert!(game.legal_destinations(sq("e4")).is_empty());
        assert_eq!(game.check_square(), None);
    }

    #[test]
    fn test_search_player_mates() {
        let mut game = Game::from_fen(
            "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
            Box::new(SearchPlayer::new(Color::White, SearchConfig::default().with_depth(1))),
            Box::new(RandomPlayer::seeded(Color::Black, 5)),
        )
        .unwrap();
        assert_eq!(game.run(), Outcome::Checkmate { winner: Color::White });
        assert_eq!(game.ply(), 1);
    }

    #[test]
    #[should_panic(expected = "white seat")]
    fn test_wrong_seat_panics() {
        Game::new(
            Box::new(RandomPlayer::seeded(Color::Black, 0)),
            Box::new(RandomPlayer::seeded(Color::Black, 0)),
        );
    }
}
